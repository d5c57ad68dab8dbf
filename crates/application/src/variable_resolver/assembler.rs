//! Output file assembly

use importer_domain::{ImportedValue, ResolvedImport};
use tracing::{debug, warn};

use crate::ports::VariableMap;

/// Builds the output mapping from resolved imports.
///
/// Entries are keyed by input key in the order given. A later import with
/// the same key replaces the earlier value in place.
#[must_use]
pub fn assemble<'a, I>(imports: I) -> VariableMap
where
    I: IntoIterator<Item = &'a ResolvedImport>,
{
    let mut outputs = VariableMap::new();

    for import in imports {
        let value = ImportedValue::encode(&import.value, import.encoding).unwrap_or_else(|e| {
            warn!(key = %import.input_key, error = %e, "importing value as a plain string");
            ImportedValue::plain(&import.value.value)
        });

        if outputs
            .insert(import.input_key.clone(), value.into_json())
            .is_some()
        {
            debug!(key = %import.input_key, "duplicate key, keeping the later value");
        }
    }

    outputs
}
