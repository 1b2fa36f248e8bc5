//! Class-level directive rules.

use crate::args::Args;
use crate::directives as d;
use crate::error::MappingError;
use crate::metadata::{
    default_cache_region, CacheDescriptor, CacheUsage, ChangeTrackingPolicy, ClassMetadata,
    DiscriminatorColumn, IndexDescriptor, InheritanceType, NamedNativeQuery, NamedQuery,
    SqlResultSetMapping, TableDescriptor, DEFAULT_DISCRIMINATOR_LENGTH,
    DEFAULT_DISCRIMINATOR_TYPE,
};
use dcm_sdl::ObjectTypeDefinition;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use tracing::debug;

/// Apply the class-level rules in order: entity kind, table, cache,
/// queries, inheritance, change tracking.
pub(super) fn evaluate_class(
    class_name: &str,
    definition: &ObjectTypeDefinition,
    metadata: &mut ClassMetadata,
) -> Result<(), MappingError> {
    resolve_entity_kind(class_name, definition, metadata)?;

    if let Some(table) = definition.directive(d::TABLE) {
        let table = table_descriptor(&Args::of(class_name, table))?;
        debug!(table = ?table.name, "primary table");
        metadata.set_primary_table(table);
    }

    if let Some(cache) = definition.directive(d::CACHE) {
        let args = Args::of(class_name, cache);
        let usage = cache_usage(class_name, &args)?.unwrap_or_default();
        let region = args
            .opt_str("region")?
            .unwrap_or_else(|| default_cache_region(class_name));
        metadata.enable_cache(CacheDescriptor::new(usage, region));
    }

    evaluate_queries(class_name, definition, metadata)?;
    evaluate_inheritance(class_name, definition, metadata)?;

    if let Some(tracking) = definition.directive(d::CHANGE_TRACKING) {
        let policy = Args::of(class_name, tracking).req_str("policy")?;
        let policy = ChangeTrackingPolicy::parse(&policy).ok_or_else(|| {
            MappingError::InvalidEnumValue {
                class: class_name.to_string(),
                concept: "change tracking policy",
                value: policy.clone(),
            }
        })?;
        metadata.set_change_tracking_policy(policy);
    }

    Ok(())
}

/// Exactly one kind; precedence Entity, MappedSuperClass, Embeddable.
fn resolve_entity_kind(
    class_name: &str,
    definition: &ObjectTypeDefinition,
    metadata: &mut ClassMetadata,
) -> Result<(), MappingError> {
    if let Some(entity) = definition.directive(d::ENTITY) {
        let args = Args::of(class_name, entity);
        metadata.mark_entity();
        if let Some(repository) = args.opt_str("repositoryClass")? {
            metadata.set_custom_repository_class(repository);
        }
        if args.flag("readOnly")? {
            metadata.mark_read_only();
        }
    } else if let Some(superclass) = definition.directive(d::MAPPED_SUPERCLASS) {
        let args = Args::of(class_name, superclass);
        if let Some(repository) = args.opt_str("repositoryClass")? {
            metadata.set_custom_repository_class(repository);
        }
        metadata.mark_mapped_superclass();
    } else if definition.directive(d::EMBEDDABLE).is_some() {
        metadata.mark_embeddable();
    } else {
        return Err(MappingError::InvalidEntityKind {
            class: class_name.to_string(),
        });
    }
    Ok(())
}

fn table_descriptor(args: &Args<'_>) -> Result<TableDescriptor, MappingError> {
    Ok(TableDescriptor {
        name: args.opt_str("name")?,
        schema: args.opt_str("schema")?,
        indexes: index_descriptors(args, "indexes")?,
        unique_constraints: index_descriptors(args, "uniqueConstraints")?,
        options: args.object_attributes("options")?,
    })
}

fn index_descriptors(args: &Args<'_>, name: &str) -> Result<Vec<IndexDescriptor>, MappingError> {
    args.objects(name)?
        .iter()
        .map(|index| {
            let descriptor = IndexDescriptor {
                name: index.opt_str("name")?,
                columns: index.str_list("columns")?,
                fields: index.str_list("fields")?,
                flags: index.str_list("flags")?,
                options: index.object_attributes("options")?,
            };
            if descriptor.columns.is_empty() && descriptor.fields.is_empty() {
                return Err(index.missing("columns"));
            }
            Ok(descriptor)
        })
        .collect()
}

/// Resolve the `usage` argument of a `@Cache` directive.
pub(super) fn cache_usage(
    class_name: &str,
    args: &Args<'_>,
) -> Result<Option<CacheUsage>, MappingError> {
    match args.opt_str("usage")? {
        None => Ok(None),
        Some(usage) => CacheUsage::parse(&usage)
            .map(Some)
            .ok_or_else(|| MappingError::InvalidCacheUsage {
                class: class_name.to_string(),
                usage,
            }),
    }
}

fn evaluate_queries(
    class_name: &str,
    definition: &ObjectTypeDefinition,
    metadata: &mut ClassMetadata,
) -> Result<(), MappingError> {
    if let Some(native) = definition.directive(d::NAMED_NATIVE_QUERIES) {
        for query in Args::of(class_name, native).objects("queries")? {
            metadata.add_named_native_query(NamedNativeQuery {
                name: query.req_str("name")?,
                query: query.req_str("query")?,
                result_class: query.opt_str("resultClass")?,
                result_set_mapping: query.opt_str("resultSetMapping")?,
            });
        }
    }

    if let Some(mappings) = definition.directive(d::SQL_RESULT_SET_MAPPINGS) {
        for mapping in Args::of(class_name, mappings).objects("mappings")? {
            metadata.add_sql_result_set_mapping(SqlResultSetMapping {
                name: mapping.req_str("name")?,
                entities: verbatim_list(&mapping, "entities")?,
                columns: verbatim_list(&mapping, "columns")?,
            });
        }
    }

    if let Some(named) = definition.directive(d::NAMED_QUERIES) {
        for query in Args::of(class_name, named).objects("queries")? {
            metadata.add_named_query(NamedQuery {
                name: query.req_str("name")?,
                query: query.req_str("query")?,
            });
        }
    }

    Ok(())
}

fn verbatim_list(args: &Args<'_>, name: &str) -> Result<Vec<JsonValue>, MappingError> {
    match args.get(name) {
        None => Ok(Vec::new()),
        Some(value) => match value.to_json() {
            JsonValue::Array(items) => Ok(items),
            _ => Err(args.invalid(name, "a list", value)),
        },
    }
}

fn evaluate_inheritance(
    class_name: &str,
    definition: &ObjectTypeDefinition,
    metadata: &mut ClassMetadata,
) -> Result<(), MappingError> {
    let Some(inheritance) = definition.directive(d::INHERITANCE) else {
        return Ok(());
    };

    let value = Args::of(class_name, inheritance).req_str("type")?;
    let inheritance_type =
        InheritanceType::parse(&value).ok_or_else(|| MappingError::InvalidEnumValue {
            class: class_name.to_string(),
            concept: "inheritance type",
            value: value.clone(),
        })?;
    metadata.set_inheritance_type(inheritance_type);

    if inheritance_type.is_none() {
        return Ok(());
    }

    let discriminator = definition.directive(d::DISCRIMINATOR).ok_or_else(|| {
        MappingError::MissingDiscriminator {
            class: class_name.to_string(),
            inheritance: inheritance_type.to_string(),
        }
    })?;
    let args = Args::of(class_name, discriminator);

    metadata.set_discriminator_column(DiscriminatorColumn {
        name: args.req_str("column")?,
        type_name: args
            .opt_str("type")?
            .unwrap_or_else(|| DEFAULT_DISCRIMINATOR_TYPE.to_string()),
        length: Some(args.opt_u32("length")?.unwrap_or(DEFAULT_DISCRIMINATOR_LENGTH)),
    });

    if !args.has("map") {
        return Err(args.missing("map"));
    }
    let mut map = BTreeMap::new();
    for entry in args.objects("map")? {
        map.insert(entry.req_str("alias")?, entry.req_str("class")?);
    }
    debug!(
        inheritance = %inheritance_type,
        subclasses = map.len(),
        "discriminator map"
    );
    metadata.set_discriminator_map(map);

    Ok(())
}
