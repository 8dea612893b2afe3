//! Interactive build session
//!
//! One `BuildSession` constructs one record: a blocking request/response
//! loop where each field prompt suspends awaiting a single line of input.
//! The session walks the record schema in declared field order, resolves
//! each field, and dispatches to itself (nested record), the array
//! collector, or the coercer. Leaves accumulate in a `FlattenedStore`;
//! the assembly pass then reconstructs the nested object graph.
//!
//! Recoverable input errors re-prompt the same field only. Structural
//! errors abort the whole build, leaving the caller's outer loop intact.

use std::io;

use crate::schema::{
    effective_schema, resolve, DefaultPolicy, ResolvedField, SchemaError, SchemaNode,
};
use crate::value::Datum;

use super::assemble::assemble;
use super::coerce::coerce;
use super::errors::BuildResult;
use super::store::{join_path, FlattenedStore};

/// Reserved token that ends an array collection loop.
pub const ARRAY_SENTINEL: &str = "done";

/// Session lifecycle states; the state names the suspension point the
/// session is blocked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingField,
    AwaitingArrayItem,
    Closed,
}

/// Raw input boundary: one line of text per prompt.
pub trait Prompter {
    /// Shows a prompt and blocks for one line of input.
    fn prompt(&mut self, text: &str) -> io::Result<String>;

    /// Shows a feedback line (validation failures, collection hints).
    fn notify(&mut self, text: &str) -> io::Result<()>;
}

/// Scripted prompter: answers prompts from a fixed list of lines.
///
/// Used by tests and by non-interactive callers that replay a recorded
/// input sequence.
pub struct ScriptedPrompter {
    lines: Vec<String>,
    next: usize,
    pub transcript: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            next: 0,
            transcript: Vec::new(),
        }
    }

    /// Number of scripted lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len().saturating_sub(self.next)
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, text: &str) -> io::Result<String> {
        self.transcript.push(text.to_string());
        let line = self
            .lines
            .get(self.next)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))?;
        self.next += 1;
        Ok(line)
    }

    fn notify(&mut self, text: &str) -> io::Result<()> {
        self.transcript.push(text.to_string());
        Ok(())
    }
}

/// One record construction session.
pub struct BuildSession<'a, P: Prompter> {
    prompter: &'a mut P,
    state: SessionState,
}

impl<'a, P: Prompter> BuildSession<'a, P> {
    pub fn new(prompter: &'a mut P) -> Self {
        Self {
            prompter,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runs the full construction: traversal, then assembly.
    ///
    /// The schema must be a record and is shape-checked up front, so a
    /// malformed tree never produces a single prompt.
    pub fn build(&mut self, schema: &SchemaNode) -> BuildResult<Datum> {
        schema.validate_shape()?;
        if schema.fields().is_none() {
            return Err(SchemaError::malformed(format!(
                "top-level schema must be a record, got {}",
                schema.type_name()
            ))
            .into());
        }

        let result = self.collect_record(schema, "");
        self.state = SessionState::Closed;
        let store = result?;
        Ok(assemble(schema, &store)?)
    }

    /// Recursive descent over a record's fields, in declared order.
    fn collect_record(&mut self, schema: &SchemaNode, prefix: &str) -> BuildResult<FlattenedStore> {
        let fields = schema
            .fields()
            .ok_or_else(|| SchemaError::malformed("expected a record node"))?;

        let mut store = FlattenedStore::new();
        for field in fields {
            let path = join_path(prefix, &field.name);
            let resolved = resolve(field)?;

            match resolved.effective {
                SchemaNode::Record { .. } => {
                    let effective = resolved.effective;
                    let sub = self.collect_record(effective, &path)?;
                    store.merge(sub)?;
                }
                SchemaNode::Array { .. } => {
                    let items = self.collect_array(resolved.effective, &path)?;
                    store.insert_items(path, items)?;
                }
                _ => {
                    let value = self.prompt_leaf(&path, &resolved)?;
                    store.insert_leaf(path, value)?;
                }
            }
        }
        Ok(store)
    }

    /// Collects array items until the sentinel token; zero items is a
    /// valid terminal result, item order is insertion order.
    fn collect_array(
        &mut self,
        schema: &SchemaNode,
        path: &str,
    ) -> BuildResult<Vec<FlattenedStore>> {
        let element = schema
            .element()
            .ok_or_else(|| SchemaError::malformed("expected an array node"))?;
        // Union-typed elements resolve like fields: nullable, one
        // non-null variant.
        let (element, nullable) = effective_schema(element, path)?;

        self.prompter.notify(&format!(
            "Collecting items for '{}' (enter '{}' to finish)",
            path, ARRAY_SENTINEL
        ))?;

        let mut items = Vec::new();
        loop {
            self.state = SessionState::AwaitingArrayItem;
            let line = self.prompter.prompt(&format!(
                "add item to '{}'? (Enter to add, '{}' to finish): ",
                path, ARRAY_SENTINEL
            ))?;
            if line.trim().eq_ignore_ascii_case(ARRAY_SENTINEL) {
                return Ok(items);
            }

            // Items are independent units: no dotted-path prefix.
            let item = match element {
                SchemaNode::Record { .. } => self.collect_record(element, "")?,
                _ => {
                    let resolved = ResolvedField {
                        effective: element,
                        nullable,
                        default: DefaultPolicy::None,
                    };
                    let value = self.prompt_leaf(path, &resolved)?;
                    let mut store = FlattenedStore::new();
                    store.insert_leaf("", value)?;
                    store
                }
            };
            items.push(item);
        }
    }

    /// Prompts for one leaf value, looping until it coerces.
    ///
    /// Recoverable errors re-prompt this field only; they never abort
    /// the record.
    fn prompt_leaf(&mut self, path: &str, resolved: &ResolvedField<'_>) -> BuildResult<Datum> {
        let hint = match &resolved.default {
            DefaultPolicy::Value(value) => format!(" (default: {})", value),
            _ if resolved.nullable => " (optional)".to_string(),
            _ => String::new(),
        };
        let prompt = format!("{} ({}){}: ", path, resolved.effective.type_name(), hint);

        loop {
            self.state = SessionState::AwaitingField;
            let line = self.prompter.prompt(&prompt)?;
            match coerce(line.trim(), resolved, path) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_recoverable() => {
                    self.prompter.notify(&format!("invalid value: {}", err))?;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{parse_document, FieldDef, PrimitiveKind};

    fn user_schema() -> SchemaNode {
        parse_document(
            r#"{
                "type": "record", "name": "User",
                "fields": [
                    {"name": "userId", "type": "string"},
                    {"name": "age", "type": ["null", "int"]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_simple_record_build() {
        let schema = user_schema();
        let mut prompter = ScriptedPrompter::new(["u1", "30"]);
        let mut session = BuildSession::new(&mut prompter);

        let record = session.build(&schema).unwrap();
        assert_eq!(record.field("userId"), Some(&Datum::Str("u1".into())));
        assert_eq!(record.field("age"), Some(&Datum::Int(30)));
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn test_nullable_field_accepts_empty() {
        let schema = user_schema();
        let mut prompter = ScriptedPrompter::new(["u1", ""]);
        let mut session = BuildSession::new(&mut prompter);

        let record = session.build(&schema).unwrap();
        assert_eq!(record.field("age"), Some(&Datum::Null));
    }

    #[test]
    fn test_invalid_input_reprompts_same_field() {
        let schema = user_schema();
        let mut prompter = ScriptedPrompter::new(["u1", "not-a-number", "30"]);
        let mut session = BuildSession::new(&mut prompter);

        let record = session.build(&schema).unwrap();
        assert_eq!(record.field("age"), Some(&Datum::Int(30)));
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_scalar_array_collection() {
        let schema = parse_document(
            r#"{
                "type": "record", "name": "Post",
                "fields": [
                    {"name": "tags", "type": {"type": "array", "items": "string"}}
                ]
            }"#,
        )
        .unwrap();

        let mut prompter = ScriptedPrompter::new(["", "rust", "", "schema", "done"]);
        let mut session = BuildSession::new(&mut prompter);

        let record = session.build(&schema).unwrap();
        assert_eq!(
            record.field("tags"),
            Some(&Datum::Array(vec![
                Datum::Str("rust".into()),
                Datum::Str("schema".into()),
            ]))
        );
    }

    #[test]
    fn test_empty_array_valid() {
        let schema = parse_document(
            r#"{
                "type": "record", "name": "Post",
                "fields": [
                    {"name": "tags", "type": {"type": "array", "items": "string"}}
                ]
            }"#,
        )
        .unwrap();

        let mut prompter = ScriptedPrompter::new(["done"]);
        let mut session = BuildSession::new(&mut prompter);

        let record = session.build(&schema).unwrap();
        assert_eq!(record.field("tags"), Some(&Datum::Array(vec![])));
    }

    #[test]
    fn test_nullable_union_array_element() {
        let schema = parse_document(
            r#"{
                "type": "record", "name": "Post",
                "fields": [
                    {"name": "tags", "type": {"type": "array", "items": ["null", "string"]}}
                ]
            }"#,
        )
        .unwrap();

        // Empty input on a nullable element yields a null item
        let mut prompter = ScriptedPrompter::new(["", "rust", "", "", "done"]);
        let mut session = BuildSession::new(&mut prompter);

        let record = session.build(&schema).unwrap();
        assert_eq!(
            record.field("tags"),
            Some(&Datum::Array(vec![
                Datum::Str("rust".into()),
                Datum::Null,
            ]))
        );
    }

    #[test]
    fn test_multi_variant_union_array_element_rejected() {
        let schema = parse_document(
            r#"{
                "type": "record", "name": "Post",
                "fields": [
                    {"name": "tags", "type": {"type": "array", "items": ["null", "string", "int"]}}
                ]
            }"#,
        )
        .unwrap();

        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let mut session = BuildSession::new(&mut prompter);

        let err = session.build(&schema).unwrap_err();
        assert_eq!(err.code(), "CAST_UNSUPPORTED_UNION_SHAPE");
    }

    #[test]
    fn test_sentinel_case_insensitive() {
        let schema = parse_document(
            r#"{
                "type": "record", "name": "Post",
                "fields": [
                    {"name": "tags", "type": {"type": "array", "items": "string"}}
                ]
            }"#,
        )
        .unwrap();

        let mut prompter = ScriptedPrompter::new(["DONE"]);
        let mut session = BuildSession::new(&mut prompter);
        assert!(session.build(&schema).is_ok());
    }

    #[test]
    fn test_multi_variant_union_aborts_build() {
        let schema = SchemaNode::Record {
            name: "Bad".into(),
            fields: vec![FieldDef::required(
                "value",
                SchemaNode::Union {
                    variants: vec![
                        SchemaNode::Null,
                        SchemaNode::Primitive(PrimitiveKind::Int),
                        SchemaNode::Primitive(PrimitiveKind::String),
                    ],
                },
            )],
        };

        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let mut session = BuildSession::new(&mut prompter);

        let err = session.build(&schema).unwrap_err();
        assert!(!err.is_recoverable());
        assert_eq!(err.code(), "CAST_UNSUPPORTED_UNION_SHAPE");
        // No prompt was ever issued for the doomed field
        assert!(prompter.transcript.is_empty());
    }

    #[test]
    fn test_non_record_top_level_rejected() {
        let schema = SchemaNode::Primitive(PrimitiveKind::Int);
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let mut session = BuildSession::new(&mut prompter);
        assert!(session.build(&schema).is_err());
    }
}
