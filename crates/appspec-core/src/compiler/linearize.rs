//! C3 linearization of ancestor layers.
use std::sync::Arc;

use crate::compiler::layer::{CompiledType, Layer};
use crate::kernel::error::{Error, ErrorContext, Result};

fn contains(seq: &[Arc<Layer>], layer: &Arc<Layer>) -> bool {
    seq.iter().any(|candidate| Arc::ptr_eq(candidate, layer))
}

/// Ancestor layers of a type with the given direct bases, most-derived first.
/// The type's own layer is not included.
pub fn ancestors(type_name: &str, bases: &[Arc<CompiledType>]) -> Result<Vec<Arc<Layer>>> {
    for (index, base) in bases.iter().enumerate() {
        if bases[..index].iter().any(|earlier| Arc::ptr_eq(earlier.own(), base.own())) {
            let context = ErrorContext::new().with("type", type_name).with("base", base.name());
            return Err(Error::developer_with("Duplicate base in type declaration", context));
        }
    }

    let mut sequences: Vec<Vec<Arc<Layer>>> = bases.iter().map(|base| base.layers().to_vec()).collect();
    sequences.push(bases.iter().map(|base| base.own().clone()).collect());

    let mut merged: Vec<Arc<Layer>> = Vec::new();
    loop {
        sequences.retain(|seq| !seq.is_empty());
        if sequences.is_empty() {
            return Ok(merged);
        }

        let candidate = sequences
            .iter()
            .map(|seq| &seq[0])
            .find(|head| !sequences.iter().any(|seq| contains(&seq[1..], head)))
            .cloned();

        let Some(next) = candidate else {
            let names = bases.iter().map(|base| base.name()).collect::<Vec<_>>().join(", ");
            let context = ErrorContext::new().with("type", type_name).with("bases", names);
            return Err(Error::developer_with(
                "Cannot create a consistent layer order for the given bases",
                context,
            ));
        };

        for seq in sequences.iter_mut() {
            if Arc::ptr_eq(&seq[0], &next) {
                seq.remove(0);
            }
        }
        merged.push(next);
    }
}
