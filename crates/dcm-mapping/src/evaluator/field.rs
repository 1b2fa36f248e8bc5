//! Field-level directive rules.

use super::class::cache_usage;
use crate::args::Args;
use crate::directives as d;
use crate::error::MappingError;
use crate::metadata::{
    AssociationKind, AssociationMapping, CacheDescriptor, ClassMetadata, ColumnPrefix,
    CustomGeneratorDefinition, EmbeddedMapping, FetchMode, FieldMapping, GeneratorType,
    JoinColumn, JoinTable, OrderBy, OrderDirection,
};
use dcm_sdl::{Directive, FieldDefinition, Value};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, trace};

/// The single mapping a field contributes.
///
/// Selected by directive precedence; the first present directive wins.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FieldKind<'a> {
    Column(&'a Directive),
    OneToOne(&'a Directive),
    OneToMany(&'a Directive),
    ManyToOne(&'a Directive),
    ManyToMany(&'a Directive),
    Embedded(&'a Directive),
    /// No mapping directive: the field is not persisted.
    Transient,
}

impl<'a> FieldKind<'a> {
    pub(crate) fn of(field: &'a FieldDefinition) -> Self {
        let precedence: [(&str, fn(&'a Directive) -> Self); 6] = [
            (d::COLUMN, Self::Column),
            (d::ONE_TO_ONE, Self::OneToOne),
            (d::ONE_TO_MANY, Self::OneToMany),
            (d::MANY_TO_ONE, Self::ManyToOne),
            (d::MANY_TO_MANY, Self::ManyToMany),
            (d::EMBEDDED, Self::Embedded),
        ];
        precedence
            .into_iter()
            .find_map(|(name, kind)| field.directive(name).map(kind))
            .unwrap_or(Self::Transient)
    }
}

/// Apply the field-level rules to one field.
pub(super) fn evaluate_field(
    class_name: &str,
    field: &FieldDefinition,
    metadata: &mut ClassMetadata,
) -> Result<(), MappingError> {
    if field.directive(d::TABLE_GENERATOR).is_some() {
        return Err(MappingError::GeneratorNotImplemented {
            class: class_name.to_string(),
            field: field.name.clone(),
            generator: "table",
        });
    }

    let cache = match field.directive(d::CACHE) {
        Some(cache) => Some(association_cache(class_name, field, cache, metadata)?),
        None => None,
    };

    let join_columns = match field.directive(d::JOIN) {
        Some(join) => join_columns(class_name, field, join)?,
        None => Vec::new(),
    };

    match FieldKind::of(field) {
        FieldKind::Column(column) => map_column(class_name, field, column, cache, metadata),
        FieldKind::OneToOne(directive) => {
            let args = Args::of(class_name, directive);
            let mut mapping = association(&args, field, AssociationKind::OneToOne, cache)?;
            read_sides(&args, class_name, field, &mut mapping)?;
            mapping.orphan_removal = args.flag("orphanRemoval")?;
            mapping.join_columns = join_columns;
            mapping.id = field.directive(d::ID).is_some();
            debug!(field = %field.name, target = %mapping.target_entity, "one-to-one");
            metadata.map_one_to_one(mapping);
            Ok(())
        }
        FieldKind::OneToMany(directive) => {
            let args = Args::of(class_name, directive);
            let mut mapping = association(&args, field, AssociationKind::OneToMany, cache)?;
            mapping.mapped_by = Some(args.req_str("mappedBy")?);
            mapping.index_by = args.opt_str("indexBy")?;
            mapping.orphan_removal = args.flag("orphanRemoval")?;
            mapping.order_by = order_by(class_name, field)?;
            debug!(field = %field.name, target = %mapping.target_entity, "one-to-many");
            metadata.map_one_to_many(mapping);
            Ok(())
        }
        FieldKind::ManyToOne(directive) => {
            let args = Args::of(class_name, directive);
            let mut mapping = association(&args, field, AssociationKind::ManyToOne, cache)?;
            mapping.inversed_by = args.opt_str("inversedBy")?;
            mapping.join_columns = join_columns;
            mapping.id = field.directive(d::ID).is_some();
            debug!(field = %field.name, target = %mapping.target_entity, "many-to-one");
            metadata.map_many_to_one(mapping);
            Ok(())
        }
        FieldKind::ManyToMany(directive) => {
            let args = Args::of(class_name, directive);
            let mut mapping = association(&args, field, AssociationKind::ManyToMany, cache)?;
            read_sides(&args, class_name, field, &mut mapping)?;
            mapping.index_by = args.opt_str("indexBy")?;
            mapping.orphan_removal = args.flag("orphanRemoval")?;
            mapping.order_by = order_by(class_name, field)?;
            if let Some(join_table) = field.directive(d::JOIN_TABLE) {
                let args = Args::of(class_name, join_table);
                mapping.join_table = Some(join_table_descriptor(&args)?);
            }
            debug!(field = %field.name, target = %mapping.target_entity, "many-to-many");
            metadata.map_many_to_many(mapping);
            Ok(())
        }
        FieldKind::Embedded(directive) => {
            let args = Args::of(class_name, directive);
            let mut mapping = EmbeddedMapping::new(&field.name, args.req_str("class")?);
            mapping.column_prefix = match args.get("columnPrefix") {
                None | Some(Value::Boolean(true)) => ColumnPrefix::Default,
                Some(Value::Boolean(false)) => ColumnPrefix::Disabled,
                Some(Value::String(prefix)) => ColumnPrefix::Custom(prefix.clone()),
                Some(other) => {
                    return Err(args.invalid("columnPrefix", "a string or false", other))
                }
            };
            debug!(field = %field.name, class = %mapping.class, "embedded");
            metadata.map_embedded(mapping);
            Ok(())
        }
        FieldKind::Transient => {
            trace!(field = %field.name, "no mapping directive");
            Ok(())
        }
    }
}

/// Column mapping, identifier flags and generator definitions.
fn map_column(
    class_name: &str,
    field: &FieldDefinition,
    column: &Directive,
    cache: Option<CacheDescriptor>,
    metadata: &mut ClassMetadata,
) -> Result<(), MappingError> {
    let args = Args::of(class_name, column);

    let mut mapping = FieldMapping::new(&field.name);
    mapping.attributes = args.to_attributes();
    mapping
        .attributes
        .insert("fieldName".to_string(), JsonValue::String(field.name.clone()));
    if let Some(cache) = cache {
        mapping.attributes.insert(
            "cache".to_string(),
            json!({ "usage": cache.usage.as_str(), "region": cache.region }),
        );
    }
    if let Some(name) = args.opt_str("name")? {
        mapping.column_name = name;
    }
    if let Some(type_name) = args.opt_str("type")? {
        mapping.type_name = type_name;
    }
    mapping.id = field.directive(d::ID).is_some();

    if let Some(generated) = field.directive(d::GENERATED_VALUE) {
        let strategy = Args::of(class_name, generated)
            .opt_str("strategy")?
            .unwrap_or_else(|| GeneratorType::Auto.as_str().to_string());
        let generator =
            GeneratorType::parse(&strategy).ok_or_else(|| MappingError::InvalidEnumValue {
                class: class_name.to_string(),
                concept: "generator strategy",
                value: strategy.clone(),
            })?;
        metadata.set_id_generator_type(generator);
    }

    if field.directive(d::VERSION).is_some() {
        metadata.set_version_mapping(&field.name);
    }

    debug!(
        field = %field.name,
        column = %mapping.column_name,
        column_type = %mapping.type_name,
        id = mapping.id,
        "column"
    );
    metadata.map_field(mapping);

    // @TableGenerator is rejected before dispatch.
    if let Some(sequence) = field.directive(d::SEQUENCE_GENERATOR) {
        metadata.set_sequence_generator_definition(Args::of(class_name, sequence).to_attributes());
        if metadata.id_generator_type() == GeneratorType::None {
            metadata.set_id_generator_type(GeneratorType::Sequence);
        }
    } else if let Some(custom) = field.directive(d::CUSTOM_ID_GENERATOR) {
        let class = Args::of(class_name, custom).req_str("class")?;
        metadata.set_custom_generator_definition(CustomGeneratorDefinition { class });
        if metadata.id_generator_type() == GeneratorType::None {
            metadata.set_id_generator_type(GeneratorType::Custom);
        }
    }

    Ok(())
}

/// Association-cache defaults merged with the field's `@Cache`.
fn association_cache(
    class_name: &str,
    field: &FieldDefinition,
    cache: &Directive,
    metadata: &ClassMetadata,
) -> Result<CacheDescriptor, MappingError> {
    let args = Args::of(class_name, cache);
    let mut descriptor = metadata.association_cache_defaults(&field.name);
    if let Some(usage) = cache_usage(class_name, &args)? {
        descriptor.usage = usage;
    }
    if let Some(region) = args.opt_str("region")? {
        descriptor.region = region;
    }
    Ok(descriptor)
}

/// Join columns from `@Join(column: ...)` and/or `@Join(columns: [...])`.
fn join_columns(
    class_name: &str,
    field: &FieldDefinition,
    join: &Directive,
) -> Result<Vec<JoinColumn>, MappingError> {
    let args = Args::of(class_name, join);
    if !args.has("column") && !args.has("columns") {
        return Err(MappingError::MissingJoinColumns {
            class: class_name.to_string(),
            field: field.name.clone(),
        });
    }

    let mut columns = Vec::new();
    if let Some(column) = args.get("column") {
        columns.push(join_column(&args, "column", column)?);
    }
    columns.extend(join_column_list(&args, "columns")?);
    Ok(columns)
}

/// A join column given as a column name or as an object.
fn join_column<'a>(
    args: &Args<'a>,
    name: &str,
    value: &'a Value,
) -> Result<JoinColumn, MappingError> {
    match value {
        Value::String(column) => Ok(JoinColumn::new(column)),
        Value::Object(_) => {
            let object = args.nested(name, value)?;
            Ok(JoinColumn {
                name: object.req_str("name")?,
                referenced_column_name: object.opt_str("referencedColumnName")?,
                unique: object.flag("unique")?,
                nullable: object.opt_bool("nullable")?.unwrap_or(true),
                on_delete: object.opt_str("onDelete")?,
                column_definition: object.opt_str("columnDefinition")?,
            })
        }
        other => Err(args.invalid(name, "a column name or join column object", other)),
    }
}

fn join_column_list(args: &Args<'_>, name: &str) -> Result<Vec<JoinColumn>, MappingError> {
    match args.get(name) {
        None => Ok(Vec::new()),
        Some(Value::List(items)) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| join_column(args, &format!("{}[{}]", name, idx), item))
            .collect(),
        Some(single) => Ok(vec![join_column(args, name, single)?]),
    }
}

fn join_table_descriptor(args: &Args<'_>) -> Result<JoinTable, MappingError> {
    Ok(JoinTable {
        name: args.opt_str("name")?,
        schema: args.opt_str("schema")?,
        join_columns: join_column_list(args, "joinColumns")?,
        inverse_join_columns: join_column_list(args, "inverseJoinColumns")?,
    })
}

/// Common association arguments: target, cascade, fetch and cache.
fn association(
    args: &Args<'_>,
    field: &FieldDefinition,
    kind: AssociationKind,
    cache: Option<CacheDescriptor>,
) -> Result<AssociationMapping, MappingError> {
    let mut mapping = AssociationMapping::new(&field.name, kind, args.req_str("targetEntity")?);
    mapping.cascade = args
        .str_list("cascade")?
        .into_iter()
        .map(|op| op.to_lowercase())
        .collect();
    if let Some(fetch) = args.opt_str("fetch")? {
        mapping.fetch = FetchMode::parse(&fetch)
            .ok_or_else(|| args_enum_error(args, "fetch mode", fetch))?;
    }
    mapping.cache = cache;
    Ok(mapping)
}

/// `mappedBy` / `inversedBy`; at most one side may be declared.
fn read_sides(
    args: &Args<'_>,
    class_name: &str,
    field: &FieldDefinition,
    mapping: &mut AssociationMapping,
) -> Result<(), MappingError> {
    mapping.mapped_by = args.opt_str("mappedBy")?;
    mapping.inversed_by = args.opt_str("inversedBy")?;
    if mapping.mapped_by.is_some() && mapping.inversed_by.is_some() {
        return Err(MappingError::ConflictingAssociationSides {
            class: class_name.to_string(),
            field: field.name.clone(),
        });
    }
    Ok(())
}

/// Ordering terms from `@OrderBy(field: "ASC", other: "DESC")`.
fn order_by(class_name: &str, field: &FieldDefinition) -> Result<Vec<OrderBy>, MappingError> {
    let Some(directive) = field.directive(d::ORDER_BY) else {
        return Ok(Vec::new());
    };
    let args = Args::of(class_name, directive);
    args.names()
        .map(|name| -> Result<OrderBy, MappingError> {
            let direction = args.req_str(name)?;
            let direction = OrderDirection::parse(&direction)
                .ok_or_else(|| args_enum_error(&args, "order direction", direction))?;
            Ok(OrderBy {
                field: name.to_string(),
                direction,
            })
        })
        .collect()
}

fn args_enum_error(args: &Args<'_>, concept: &'static str, value: String) -> MappingError {
    MappingError::InvalidEnumValue {
        class: args.class().to_string(),
        concept,
        value,
    }
}
