//! Translation of sparse configuration values into driver option objects.
//!
//! Each translator starts from the driver's default options and copies over only the
//! fields the caller set. An absent field is never turned into an explicit "off",
//! which leaves the server's own default in charge.
//!
//! Composite fields (sort, projection, hint, min/max, let bindings, array filters)
//! follow the same rule: `None` is absent, while `Some` of an empty document or list
//! is forwarded as given.

use crate::options::{DatabaseConfig, FindConfig, FindOneConfig, UpdateConfig, UpdateManyConfig};
use mongodb::options::{
    DatabaseOptions, FindOneOptions, FindOptions, SelectionCriteria, UpdateOptions,
};

/// Applies `set` to `options` when `value` is present and leaves `options`
/// untouched otherwise.
pub(crate) fn set_option<O, V>(options: &mut O, value: Option<V>, set: impl FnOnce(&mut O, V)) {
    if let Some(value) = value {
        set(options, value);
    }
}

/// Copies each listed field of a configuration onto the same-named option field
/// when it is present.
macro_rules! copy_present {
    ($config:ident => $options:ident { $($field:ident),* $(,)? }) => {
        $(
            set_option(&mut $options, $config.$field, |options, value| {
                options.$field = Some(value)
            });
        )*
    };
}

/// Builds the options used to open a database handle.
pub fn database_options(config: Option<DatabaseConfig>) -> DatabaseOptions {
    let mut options = DatabaseOptions::default();
    if let Some(config) = config {
        copy_present!(config => options { read_concern, write_concern });
        set_option(&mut options, config.read_preference, |options, read_preference| {
            options.selection_criteria = Some(SelectionCriteria::ReadPreference(read_preference))
        });
    }
    options
}

/// Builds the options for a multi-document find.
pub fn find_options(config: Option<FindConfig>) -> FindOptions {
    let mut options = FindOptions::default();
    if let Some(config) = config {
        copy_present!(config => options {
            allow_disk_use,
            allow_partial_results,
            batch_size,
            limit,
            skip,
            max_await_time,
            no_cursor_timeout,
            sort,
            comment,
            hint,
            let_vars,
            max,
            min,
            projection,
            return_key,
        });
        if let Some(collation) = config.collation {
            options.collation = Some(collation);
        }
        if let Some(cursor_type) = config.cursor_type {
            options.cursor_type = Some(cursor_type);
        }
    }
    options
}

/// Builds the options for a single-document find.
pub fn find_one_options(config: Option<FindOneConfig>) -> FindOneOptions {
    let mut options = FindOneOptions::default();
    if let Some(config) = config {
        copy_present!(config => options {
            allow_partial_results,
            skip,
            sort,
            comment,
            hint,
            max,
            min,
            projection,
            return_key,
        });
        if let Some(collation) = config.collation {
            options.collation = Some(collation);
        }
    }
    options
}

/// Builds the options for an update of the first matching document.
pub fn update_one_options(config: Option<UpdateConfig>) -> UpdateOptions {
    let mut options = UpdateOptions::default();
    if let Some(config) = config {
        copy_present!(config => options {
            array_filters,
            bypass_document_validation,
            sort,
            comment,
            hint,
            let_vars,
            upsert,
        });
        if let Some(collation) = config.collation {
            options.collation = Some(collation);
        }
    }
    options
}

/// Builds the options for an update of every matching document.
pub fn update_many_options(config: Option<UpdateManyConfig>) -> UpdateOptions {
    let mut options = UpdateOptions::default();
    if let Some(config) = config {
        copy_present!(config => options {
            array_filters,
            bypass_document_validation,
            comment,
            hint,
            let_vars,
            upsert,
        });
        if let Some(collation) = config.collation {
            options.collation = Some(collation);
        }
    }
    options
}
