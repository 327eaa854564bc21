//! Field plans for record types, computed once per type and cached.

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, RwLock},
};

use once_cell::sync::Lazy;

use crate::{
    error::{Error, ErrorKind, Result},
    record::{FieldDef, Record},
};

/// The field plan for one record type: the flattened fields in declaration
/// order plus a key index for decoding.
#[derive(Debug)]
pub struct Schema {
    pub fields: Vec<FieldPlan>,
    pub by_key: HashMap<String, usize>,
}

/// One resolved field of a plan.
#[derive(Debug)]
pub struct FieldPlan {
    /// The document key the field is written under and matched against.
    pub key: String,

    /// Field slots leading to the field; more than one entry means the
    /// field was spliced in through `inline`.
    pub path: Vec<usize>,

    pub omit_empty: bool,
    pub min_size: bool,
}

static SCHEMAS: Lazy<RwLock<HashMap<TypeId, Arc<Schema>>>> = Lazy::new(Default::default);

/// Returns the cached plan for `T`, computing it on first use.
///
/// Concurrent first uses may each compute a plan, but only one is published
/// and all callers observe equivalent results. Plans are never evicted.
pub fn plan<T: Record>() -> Result<Arc<Schema>> {
    let type_id = TypeId::of::<T>();
    if let Some(schema) = SCHEMAS.read().expect("schema cache poisoned").get(&type_id) {
        return Ok(schema.clone());
    }

    let mut visiting = vec![type_id];
    let schema = Arc::new(build(
        T::fields(),
        std::any::type_name::<T>(),
        &mut visiting,
    )?);

    let mut table = SCHEMAS.write().expect("schema cache poisoned");
    Ok(table.entry(type_id).or_insert(schema).clone())
}

fn build(
    fields: &'static [FieldDef],
    record: &'static str,
    visiting: &mut Vec<TypeId>,
) -> Result<Schema> {
    let mut plans: Vec<FieldPlan> = Vec::with_capacity(fields.len());
    let mut by_key: HashMap<String, usize> = HashMap::with_capacity(fields.len());

    for (slot, field) in fields.iter().enumerate() {
        let tag = field.tag;

        if let Some(slash) = tag.find('/') {
            // Retired "key/cs" option syntax. Reconstruct the modern
            // replacement for the migration message, rejecting letters the
            // old syntax never had.
            let mut replacement = tag[..slash].to_string();
            for flag in tag[slash + 1..].chars() {
                match flag {
                    'c' => replacement.push_str(",omitempty"),
                    's' => replacement.push_str(",minsize"),
                    _ => {
                        return Err(ErrorKind::UnknownFlag {
                            flag: flag.to_string(),
                            tag: tag.to_string(),
                            record,
                        }
                        .into())
                    }
                }
            }
            return Err(ErrorKind::LegacyTag {
                tag: tag.to_string(),
                replacement,
                record,
            }
            .into());
        }

        if tag == "-" {
            continue;
        }

        let mut parts = tag.split(',');
        let key_part = parts.next().unwrap_or("");
        let mut omit_empty = false;
        let mut min_size = false;
        let mut inline = false;
        for flag in parts {
            match flag {
                "omitempty" => omit_empty = true,
                "minsize" => min_size = true,
                "inline" => inline = true,
                _ => {
                    return Err(ErrorKind::UnknownFlag {
                        flag: flag.to_string(),
                        tag: tag.to_string(),
                        record,
                    }
                    .into())
                }
            }
        }

        if inline {
            let nested = field.nested.as_ref().ok_or_else(|| {
                Error::from(ErrorKind::InlineNonRecord {
                    field: field.name,
                    record,
                })
            })?;
            let nested_id = (nested.type_id)();
            if visiting.contains(&nested_id) {
                return Err(ErrorKind::InlineCycle {
                    record: nested.type_name,
                }
                .into());
            }
            visiting.push(nested_id);
            let sub = build((nested.fields)(), nested.type_name, visiting)?;
            visiting.pop();

            for mut sub_plan in sub.fields {
                if by_key.contains_key(&sub_plan.key) {
                    return Err(ErrorKind::DuplicateKey {
                        key: sub_plan.key,
                        record,
                    }
                    .into());
                }
                sub_plan.path.insert(0, slot);
                by_key.insert(sub_plan.key.clone(), plans.len());
                plans.push(sub_plan);
            }
            continue;
        }

        let key = if key_part.is_empty() {
            field.name.to_lowercase()
        } else {
            key_part.to_string()
        };
        if by_key.contains_key(&key) {
            return Err(ErrorKind::DuplicateKey { key, record }.into());
        }
        by_key.insert(key.clone(), plans.len());
        plans.push(FieldPlan {
            key,
            path: vec![slot],
            omit_empty,
            min_size,
        });
    }

    Ok(Schema {
        fields: plans,
        by_key,
    })
}
