//! The per-class metadata record.

use super::association::AssociationMapping;
use super::embedded::EmbeddedMapping;
use super::field::FieldMapping;
use super::query::{NamedNativeQuery, NamedQuery, SqlResultSetMapping};
use super::table::{CacheDescriptor, DiscriminatorColumn, TableDescriptor};
use super::types::{ChangeTrackingPolicy, EntityKind, GeneratorType, InheritanceType};
use super::Attributes;
use serde::Serialize;
use std::collections::BTreeMap;

/// Definition of a custom identifier generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomGeneratorDefinition {
    /// Generator class name.
    pub class: String,
}

/// Mapping metadata for one class.
///
/// Created empty by the caller and filled by a single evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetadata {
    pub name: String,
    pub kind: EntityKind,
    pub custom_repository_class: Option<String>,
    pub read_only: bool,
    pub primary_table: Option<TableDescriptor>,
    pub cache: Option<CacheDescriptor>,
    pub inheritance_type: InheritanceType,
    pub discriminator_column: Option<DiscriminatorColumn>,
    /// Discriminator value to class name.
    pub discriminator_map: BTreeMap<String, String>,
    pub change_tracking_policy: ChangeTrackingPolicy,
    pub named_queries: Vec<NamedQuery>,
    pub named_native_queries: Vec<NamedNativeQuery>,
    pub sql_result_set_mappings: Vec<SqlResultSetMapping>,
    pub field_mappings: Vec<FieldMapping>,
    pub association_mappings: Vec<AssociationMapping>,
    pub embedded_classes: Vec<EmbeddedMapping>,
    /// Identifier field names in declaration order.
    pub identifier: Vec<String>,
    pub id_generator_type: GeneratorType,
    pub sequence_generator_definition: Option<Attributes>,
    pub custom_generator_definition: Option<CustomGeneratorDefinition>,
    pub version_field: Option<String>,
}

impl ClassMetadata {
    /// Create an empty record for a class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::default(),
            custom_repository_class: None,
            read_only: false,
            primary_table: None,
            cache: None,
            inheritance_type: InheritanceType::default(),
            discriminator_column: None,
            discriminator_map: BTreeMap::new(),
            change_tracking_policy: ChangeTrackingPolicy::default(),
            named_queries: Vec::new(),
            named_native_queries: Vec::new(),
            sql_result_set_mappings: Vec::new(),
            field_mappings: Vec::new(),
            association_mappings: Vec::new(),
            embedded_classes: Vec::new(),
            identifier: Vec::new(),
            id_generator_type: GeneratorType::default(),
            sequence_generator_definition: None,
            custom_generator_definition: None,
            version_field: None,
        }
    }

    // Entity kind

    pub fn mark_entity(&mut self) {
        self.kind = EntityKind::Entity;
    }

    pub fn set_custom_repository_class(&mut self, class: impl Into<String>) {
        self.custom_repository_class = Some(class.into());
    }

    pub fn mark_read_only(&mut self) {
        self.read_only = true;
    }

    pub fn mark_mapped_superclass(&mut self) {
        self.kind = EntityKind::MappedSuperclass;
    }

    pub fn mark_embeddable(&mut self) {
        self.kind = EntityKind::Embeddable;
    }

    pub fn is_mapped_superclass(&self) -> bool {
        self.kind == EntityKind::MappedSuperclass
    }

    pub fn is_embeddable(&self) -> bool {
        self.kind == EntityKind::Embeddable
    }

    // Class-level settings

    pub fn set_primary_table(&mut self, table: TableDescriptor) {
        self.primary_table = Some(table);
    }

    /// Table name, if a primary table is set and named.
    pub fn table_name(&self) -> Option<&str> {
        self.primary_table.as_ref()?.name.as_deref()
    }

    pub fn enable_cache(&mut self, cache: CacheDescriptor) {
        self.cache = Some(cache);
    }

    /// Defaults for an association cache: the class cache usage and a
    /// region derived from the class region and the field name.
    pub fn association_cache_defaults(&self, field_name: &str) -> CacheDescriptor {
        let (usage, region) = match &self.cache {
            Some(cache) => (cache.usage, cache.region.clone()),
            None => (
                Default::default(),
                super::table::default_cache_region(&self.name),
            ),
        };
        CacheDescriptor::new(usage, format!("{}__{}", region, field_name))
    }

    pub fn add_named_query(&mut self, query: NamedQuery) {
        self.named_queries.push(query);
    }

    pub fn add_named_native_query(&mut self, query: NamedNativeQuery) {
        self.named_native_queries.push(query);
    }

    pub fn add_sql_result_set_mapping(&mut self, mapping: SqlResultSetMapping) {
        self.sql_result_set_mappings.push(mapping);
    }

    pub fn set_inheritance_type(&mut self, inheritance_type: InheritanceType) {
        self.inheritance_type = inheritance_type;
    }

    pub fn inheritance_type(&self) -> InheritanceType {
        self.inheritance_type
    }

    pub fn set_discriminator_column(&mut self, column: DiscriminatorColumn) {
        self.discriminator_column = Some(column);
    }

    pub fn set_discriminator_map(&mut self, map: BTreeMap<String, String>) {
        self.discriminator_map = map;
    }

    pub fn set_change_tracking_policy(&mut self, policy: ChangeTrackingPolicy) {
        self.change_tracking_policy = policy;
    }

    // Field-level mappings

    /// Register a column mapping. A mapping with the same field name is
    /// replaced.
    pub fn map_field(&mut self, mapping: FieldMapping) {
        if mapping.id {
            self.add_identifier(&mapping.field_name);
        }
        match self
            .field_mappings
            .iter_mut()
            .find(|m| m.field_name == mapping.field_name)
        {
            Some(existing) => *existing = mapping,
            None => self.field_mappings.push(mapping),
        }
    }

    pub fn map_one_to_one(&mut self, mapping: AssociationMapping) {
        self.map_association(mapping);
    }

    pub fn map_one_to_many(&mut self, mapping: AssociationMapping) {
        self.map_association(mapping);
    }

    pub fn map_many_to_one(&mut self, mapping: AssociationMapping) {
        self.map_association(mapping);
    }

    pub fn map_many_to_many(&mut self, mapping: AssociationMapping) {
        self.map_association(mapping);
    }

    fn map_association(&mut self, mapping: AssociationMapping) {
        if mapping.id {
            self.add_identifier(&mapping.field_name);
        }
        match self
            .association_mappings
            .iter_mut()
            .find(|m| m.field_name == mapping.field_name)
        {
            Some(existing) => *existing = mapping,
            None => self.association_mappings.push(mapping),
        }
    }

    pub fn map_embedded(&mut self, mapping: EmbeddedMapping) {
        match self
            .embedded_classes
            .iter_mut()
            .find(|m| m.field_name == mapping.field_name)
        {
            Some(existing) => *existing = mapping,
            None => self.embedded_classes.push(mapping),
        }
    }

    fn add_identifier(&mut self, field_name: &str) {
        if !self.identifier.iter().any(|f| f == field_name) {
            self.identifier.push(field_name.to_string());
        }
    }

    pub fn set_version_mapping(&mut self, field_name: impl Into<String>) {
        self.version_field = Some(field_name.into());
    }

    // Identifier generation

    pub fn set_id_generator_type(&mut self, generator: GeneratorType) {
        self.id_generator_type = generator;
    }

    pub fn id_generator_type(&self) -> GeneratorType {
        self.id_generator_type
    }

    pub fn set_sequence_generator_definition(&mut self, definition: Attributes) {
        self.sequence_generator_definition = Some(definition);
    }

    pub fn set_custom_generator_definition(&mut self, definition: CustomGeneratorDefinition) {
        self.custom_generator_definition = Some(definition);
    }

    // Lookups

    pub fn get_field_mapping(&self, field_name: &str) -> Option<&FieldMapping> {
        self.field_mappings.iter().find(|m| m.field_name == field_name)
    }

    pub fn get_association_mapping(&self, field_name: &str) -> Option<&AssociationMapping> {
        self.association_mappings
            .iter()
            .find(|m| m.field_name == field_name)
    }

    pub fn get_embedded_mapping(&self, field_name: &str) -> Option<&EmbeddedMapping> {
        self.embedded_classes
            .iter()
            .find(|m| m.field_name == field_name)
    }

    /// Whether the field is mapped as a column, association or embeddable.
    pub fn has_mapping(&self, field_name: &str) -> bool {
        self.get_field_mapping(field_name).is_some()
            || self.get_association_mapping(field_name).is_some()
            || self.get_embedded_mapping(field_name).is_some()
    }

    pub fn is_identifier(&self, field_name: &str) -> bool {
        self.identifier.iter().any(|f| f == field_name)
    }

    pub fn is_identifier_composite(&self) -> bool {
        self.identifier.len() > 1
    }

    pub fn is_versioned(&self) -> bool {
        self.version_field.is_some()
    }
}
