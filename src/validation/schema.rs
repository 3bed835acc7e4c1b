//! Declarative JSON schemas, compiled once with their `$ref`s inlined.

use crate::message::MessageType;
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use tracing::trace;

const SCHEMAS: &[(&str, &str)] = &[
    ("message.json", include_str!("../../schema/message.json")),
    ("proposal.json", include_str!("../../schema/proposal.json")),
    ("vote.json", include_str!("../../schema/vote.json")),
    ("sync.json", include_str!("../../schema/sync.json")),
    ("block.json", include_str!("../../schema/block.json")),
    ("votes.json", include_str!("../../schema/votes.json")),
    ("tx.json", include_str!("../../schema/tx.json")),
    ("add-peer.json", include_str!("../../schema/add-peer.json")),
    ("remove-peer.json", include_str!("../../schema/remove-peer.json")),
    ("modify-stake.json", include_str!("../../schema/modify-stake.json")),
    ("data.json", include_str!("../../schema/data.json")),
    ("decision.json", include_str!("../../schema/decision.json")),
];

pub struct Schemas {
    proposal: JSONSchema,
    vote: JSONSchema,
    sync: JSONSchema,
    tx: JSONSchema,
}

impl Schemas {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            proposal: compile("proposal.json")?,
            vote: compile("vote.json")?,
            sync: compile("sync.json")?,
            tx: compile("tx.json")?,
        })
    }

    pub fn message(&self, kind: MessageType) -> &JSONSchema {
        match kind {
            MessageType::Proposal => &self.proposal,
            MessageType::Vote => &self.vote,
            MessageType::Sync => &self.sync,
        }
    }

    pub fn tx(&self) -> &JSONSchema {
        &self.tx
    }
}

/// Validate `instance`, returning every violation joined into one message
pub fn check(schema: &JSONSchema, instance: &Value) -> Result<(), String> {
    schema.validate(instance).map_err(|errors| {
        errors
            .map(|e| format!("{}: {}", e.instance_path, e))
            .collect::<Vec<_>>()
            .join("; ")
    })
}

fn compile(name: &str) -> anyhow::Result<JSONSchema> {
    trace!("Compiling schema {name}");
    let schema = load(name)?;
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .map_err(|e| anyhow::anyhow!("invalid schema {name}: {e}"))
}

fn load(name: &str) -> anyhow::Result<Value> {
    let (_, raw) = SCHEMAS
        .iter()
        .find(|(n, _)| *n == name)
        .ok_or_else(|| anyhow::anyhow!("unknown schema {name}"))?;
    let mut schema = serde_json::from_str(raw)?;
    resolve_refs(&mut schema)?;
    Ok(schema)
}

fn resolve_refs(value: &mut Value) -> anyhow::Result<()> {
    match value {
        Value::Object(map) => {
            let reference = map.get("$ref").and_then(Value::as_str).map(str::to_string);
            if let Some(reference) = reference {
                *value = load(&reference)?;
            } else {
                for sub in map.values_mut() {
                    resolve_refs(sub)?;
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                resolve_refs(item)?;
            }
        }
        _ => {}
    }
    Ok(())
}
