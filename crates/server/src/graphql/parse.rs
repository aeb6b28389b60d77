//! GraphQL document decoding.
//!
//! Only the subset the catalog answers is accepted: one `query` or `mutation`
//! operation whose root fields are all `product(id: ...)`, with optional
//! aliases and `$variables`. Everything else is a [`RequestError`].

use std::collections::{BTreeMap, HashMap};

use apollo_parser::{Parser, cst};
use catalog_graph_core::{Selection, SelectionSet, Value};

use super::RequestError;

/// The only root field.
pub const PRODUCT_FIELD: &str = "product";

/// The argument holding the product identifier.
pub const ID_ARGUMENT: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// A `product(...)` root field, with variables already substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct RootField {
    pub alias: Option<String>,
    /// Value of the `id` argument.
    pub id: Value,
    /// The remaining arguments as one object; mutation payload.
    pub input: Value,
    pub selection: SelectionSet,
}

impl RootField {
    /// Key under which the field appears in `data`.
    #[must_use]
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(PRODUCT_FIELD)
    }
}

/// The operation selected from a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: Option<String>,
    pub kind: OperationKind,
    pub fields: Vec<RootField>,
}

type Variables = HashMap<String, Value>;

/// Parse `query` and select the operation to run.
///
/// # Errors
///
/// Returns [`RequestError`] if the document does not parse, no single
/// operation can be selected, or it uses unsupported features.
pub fn parse(
    query: &str,
    operation_name: Option<&str>,
    variables: &serde_json::Map<String, serde_json::Value>,
) -> Result<Operation, RequestError> {
    let tree = Parser::new(query).parse();
    let errors: Vec<String> = tree.errors().map(|err| err.message().to_string()).collect();
    if !errors.is_empty() {
        return Err(RequestError::Syntax(errors.join("; ")));
    }

    let mut operations = Vec::new();
    for definition in tree.document().definitions() {
        match definition {
            cst::Definition::OperationDefinition(operation) => operations.push(operation),
            cst::Definition::FragmentDefinition(_) => return Err(RequestError::Fragment),
            _ => {
                return Err(RequestError::Syntax(
                    "type system definitions cannot be executed".to_string(),
                ));
            }
        }
    }

    let operation = select_operation(operations, operation_name)?;
    let name = operation.name().map(|name| name.text().to_string());
    let kind = match operation.operation_type() {
        None => OperationKind::Query,
        Some(op) if op.mutation_token().is_some() => OperationKind::Mutation,
        Some(op) if op.subscription_token().is_some() => {
            return Err(RequestError::UnsupportedOperation("Subscription"));
        }
        Some(_) => OperationKind::Query,
    };
    reject_directives(operation.directives())?;

    let variables = declared_variables(&operation, variables)?;
    let selection_set = operation
        .selection_set()
        .ok_or_else(|| RequestError::Syntax("operation has no selection set".to_string()))?;
    let fields = selection_set
        .selections()
        .map(|selection| root_field(selection, kind, &variables))
        .collect::<Result<Vec<_>, _>>()?;
    let fields = merge_root_fields(fields)?;

    tracing::debug!(?name, ?kind, fields = fields.len(), "Parsed operation");
    Ok(Operation { name, kind, fields })
}

fn select_operation(
    operations: Vec<cst::OperationDefinition>,
    operation_name: Option<&str>,
) -> Result<cst::OperationDefinition, RequestError> {
    match operation_name {
        Some(wanted) => operations
            .into_iter()
            .find(|op| op.name().is_some_and(|name| name.text().to_string() == wanted))
            .ok_or_else(|| RequestError::UnknownOperation(wanted.to_string())),
        None => {
            let mut operations = operations.into_iter();
            match (operations.next(), operations.next()) {
                (Some(operation), None) => Ok(operation),
                (None, _) => Err(RequestError::NoOperation),
                (Some(_), Some(_)) => Err(RequestError::AmbiguousOperation),
            }
        }
    }
}

/// Values of the operation's declared variables: the request value, else the
/// declared default, else `null`.
fn declared_variables(
    operation: &cst::OperationDefinition,
    provided: &serde_json::Map<String, serde_json::Value>,
) -> Result<Variables, RequestError> {
    let mut variables = Variables::new();
    let Some(definitions) = operation.variable_definitions() else {
        return Ok(variables);
    };
    for definition in definitions.variable_definitions() {
        let name = text(definition.variable().and_then(|v| v.name()))?;
        let value = match provided.get(&name) {
            Some(value) => Value::from(value.clone()),
            None => match definition.default_value().and_then(|d| d.value()) {
                Some(default) => literal(&default, &Variables::new())?,
                None => Value::Null,
            },
        };
        variables.insert(name, value);
    }
    Ok(variables)
}

fn root_field(
    selection: cst::Selection,
    kind: OperationKind,
    variables: &Variables,
) -> Result<RootField, RequestError> {
    let cst::Selection::Field(field) = selection else {
        return Err(RequestError::Fragment);
    };
    let name = text(field.name())?;
    if name != PRODUCT_FIELD {
        return Err(RequestError::UnknownRootField(name));
    }
    reject_directives(field.directives())?;
    let alias = field.alias().map(|alias| text(alias.name())).transpose()?;

    let mut id = None;
    let mut input = BTreeMap::new();
    for argument in field.arguments().iter().flat_map(|args| args.arguments()) {
        let argument_name = text(argument.name())?;
        let value = argument
            .value()
            .ok_or_else(|| RequestError::Syntax(format!("argument {argument_name} has no value")))?;
        let value = literal(&value, variables)?;
        if argument_name == ID_ARGUMENT {
            id = Some(value);
        } else if kind == OperationKind::Mutation {
            input.insert(argument_name, value);
        } else {
            return Err(RequestError::UnknownArgument {
                field: name,
                argument: argument_name,
            });
        }
    }
    let response_key = alias.clone().unwrap_or_else(|| name.clone());
    let id = id.ok_or(RequestError::MissingId(response_key))?;

    let selection = match field.selection_set() {
        Some(set) => selection_set(&set)?,
        None => SelectionSet::default(),
    };
    Ok(RootField {
        alias,
        id,
        input: Value::Object(input),
        selection,
    })
}

/// Merge root fields that share a response key.
///
/// Fields with the same key and arguments run once with their selections
/// combined. A key repeated with differing arguments is a [`RequestError`].
fn merge_root_fields(fields: Vec<RootField>) -> Result<Vec<RootField>, RequestError> {
    let mut merged: Vec<RootField> = Vec::with_capacity(fields.len());
    for field in fields {
        match merged
            .iter_mut()
            .find(|seen| seen.response_key() == field.response_key())
        {
            Some(seen) if seen.id == field.id && seen.input == field.input => {
                seen.selection.selections.extend(field.selection.selections);
            }
            Some(_) => {
                return Err(RequestError::ConflictingFields(
                    field.response_key().to_owned(),
                ));
            }
            None => merged.push(field),
        }
    }
    Ok(merged)
}

fn selection_set(set: &cst::SelectionSet) -> Result<SelectionSet, RequestError> {
    set.selections()
        .map(|selection| {
            let cst::Selection::Field(field) = selection else {
                return Err(RequestError::Fragment);
            };
            reject_directives(field.directives())?;
            let mut selected = Selection::field(text(field.name())?);
            if let Some(alias) = field.alias() {
                selected = selected.with_alias(text(alias.name())?);
            }
            if let Some(nested) = field.selection_set() {
                selected = selected.with_selection(selection_set(&nested)?);
            }
            Ok(selected)
        })
        .collect()
}

/// Convert an argument literal, substituting variables.
fn literal(value: &cst::Value, variables: &Variables) -> Result<Value, RequestError> {
    Ok(match value {
        cst::Value::Variable(variable) => {
            let name = text(variable.name())?;
            variables
                .get(&name)
                .cloned()
                .ok_or(RequestError::UndefinedVariable(name))?
        }
        cst::Value::StringValue(s) => Value::String(String::from(s.clone())),
        cst::Value::IntValue(i) => {
            let raw = token(i.int_token())?;
            raw.parse::<i64>()
                .map(Value::Int)
                .map_err(|_| RequestError::Syntax(format!("Int literal {raw} is out of range")))?
        }
        cst::Value::FloatValue(f) => {
            let raw = token(f.float_token())?;
            raw.parse::<f64>()
                .map(Value::Float)
                .map_err(|_| RequestError::Syntax(format!("invalid Float literal {raw}")))?
        }
        cst::Value::BooleanValue(b) => Value::Boolean(b.true_token().is_some()),
        cst::Value::NullValue(_) => Value::Null,
        cst::Value::EnumValue(e) => Value::String(text(e.name())?),
        cst::Value::ListValue(list) => Value::List(
            list.values()
                .map(|item| literal(&item, variables))
                .collect::<Result<_, _>>()?,
        ),
        cst::Value::ObjectValue(object) => Value::Object(
            object
                .object_fields()
                .map(|field| {
                    let name = text(field.name())?;
                    let value = field.value().ok_or_else(|| {
                        RequestError::Syntax(format!("object field {name} has no value"))
                    })?;
                    Ok((name, literal(&value, variables)?))
                })
                .collect::<Result<_, RequestError>>()?,
        ),
    })
}

fn reject_directives(directives: Option<cst::Directives>) -> Result<(), RequestError> {
    match directives.and_then(|d| d.directives().next()) {
        Some(directive) => Err(RequestError::Directive(text(directive.name())?)),
        None => Ok(()),
    }
}

fn text(name: Option<cst::Name>) -> Result<String, RequestError> {
    name.map(|name| name.text().to_string())
        .ok_or_else(|| RequestError::Syntax("expected a name".to_string()))
}

fn token(token: Option<apollo_parser::SyntaxToken>) -> Result<String, RequestError> {
    token
        .map(|token| token.text().to_string())
        .ok_or_else(|| RequestError::Syntax("expected a literal".to_string()))
}
