//! Directive evaluation.
//!
//! Turns one class's SDL type definition into [`ClassMetadata`]. Class-level
//! rules run first in a fixed order, then every field is evaluated in
//! declaration order. The evaluator holds no state between calls.

mod class;
mod field;

use crate::error::MappingError;
use crate::metadata::ClassMetadata;
use dcm_sdl::ObjectTypeDefinition;
use tracing::instrument;

/// Stateless evaluator over parsed class definitions.
pub struct MetadataEvaluator;

impl MetadataEvaluator {
    /// Populate `metadata` from the directives of `definition`.
    ///
    /// The first failure aborts evaluation; `metadata` may then hold the
    /// settings applied before the failing rule and should be discarded.
    #[instrument(skip(definition, metadata), fields(class = %class_name))]
    pub fn evaluate(
        class_name: &str,
        definition: &ObjectTypeDefinition,
        metadata: &mut ClassMetadata,
    ) -> Result<(), MappingError> {
        class::evaluate_class(class_name, definition, metadata)?;
        for field in definition.fields() {
            field::evaluate_field(class_name, field, metadata)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        AssociationKind, CacheDescriptor, CacheUsage, ChangeTrackingPolicy, ColumnPrefix,
        EntityKind, FetchMode, GeneratorType, InheritanceType, JoinColumn, OrderBy,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn evaluate(class_name: &str, source: &str) -> Result<ClassMetadata, MappingError> {
        let doc = dcm_sdl::parse(source).unwrap();
        let definition = doc.object_types().next().unwrap();
        let mut metadata = ClassMetadata::new(class_name);
        MetadataEvaluator::evaluate(class_name, definition, &mut metadata)?;
        Ok(metadata)
    }

    #[test]
    fn test_user_entity() {
        let metadata = evaluate(
            "User",
            r#"
            type User @Entity @Table(name: "users") {
                id: Int @Column(type: "int") @Id @GeneratedValue(strategy: "AUTO")
            }
            "#,
        )
        .unwrap();

        assert_eq!(metadata.kind, EntityKind::Entity);
        assert_eq!(metadata.table_name(), Some("users"));
        assert_eq!(metadata.field_mappings.len(), 1);
        assert_eq!(metadata.identifier, vec!["id"]);
        assert_eq!(metadata.field_mappings[0].type_name, "int");
        assert_eq!(metadata.id_generator_type(), GeneratorType::Auto);
    }

    #[test]
    fn test_mapped_superclass_without_table() {
        let metadata = evaluate("Post", "type Post @MappedSuperClass { title: String }").unwrap();
        assert!(metadata.is_mapped_superclass());
        assert!(metadata.primary_table.is_none());
    }

    #[test]
    fn test_missing_entity_kind() {
        let err = evaluate("Thing", "type Thing @Table(name: \"things\") { id: ID }").unwrap_err();
        assert!(matches!(err, MappingError::InvalidEntityKind { ref class } if class == "Thing"));
    }

    #[test]
    fn test_entity_kind_precedence() {
        let metadata = evaluate(
            "User",
            r#"type User @Embeddable @Entity(repositoryClass: "UserRepository", readOnly: true) { id: ID }"#,
        )
        .unwrap();
        assert_eq!(metadata.kind, EntityKind::Entity);
        assert!(metadata.read_only);
        assert_eq!(
            metadata.custom_repository_class.as_deref(),
            Some("UserRepository")
        );

        let metadata = evaluate("Address", "type Address @Embeddable { city: String }").unwrap();
        assert!(metadata.is_embeddable());
    }

    #[test]
    fn test_cache_usage_is_case_insensitive() {
        for usage in ["read_write", "READ_WRITE", "Read_Write"] {
            let source = format!(r#"type User @Entity @Cache(usage: "{}") {{ id: ID }}"#, usage);
            let metadata = evaluate("App\\User", &source).unwrap();
            assert_eq!(
                metadata.cache,
                Some(CacheDescriptor::new(CacheUsage::ReadWrite, "app_user"))
            );
        }

        let metadata = evaluate("User", "type User @Entity @Cache { id: ID }").unwrap();
        assert_eq!(metadata.cache.unwrap().usage, CacheUsage::ReadOnly);

        let err = evaluate("User", r#"type User @Entity @Cache(usage: "sometimes") { id: ID }"#)
            .unwrap_err();
        assert!(matches!(err, MappingError::InvalidCacheUsage { ref usage, .. } if usage == "sometimes"));
    }

    #[test]
    fn test_table_indexes_and_options() {
        let metadata = evaluate(
            "User",
            r#"
            type User @Entity @Table(
                name: "users",
                schema: "app",
                indexes: [{name: "email_idx", columns: ["email"], flags: ["fulltext"]}],
                uniqueConstraints: [{name: "login_uq", columns: ["login", "tenant"]}],
                options: {charset: "utf8mb4"}
            ) { id: ID }
            "#,
        )
        .unwrap();

        let table = metadata.primary_table.unwrap();
        assert_eq!(table.schema.as_deref(), Some("app"));
        let index = table.get_index("email_idx").unwrap();
        assert_eq!(index.columns, vec!["email"]);
        assert_eq!(index.flags, vec!["fulltext"]);
        assert_eq!(table.unique_constraints[0].columns, vec!["login", "tenant"]);
        assert_eq!(table.options.get("charset"), Some(&json!("utf8mb4")));
    }

    #[test]
    fn test_index_without_columns() {
        let err = evaluate(
            "User",
            r#"type User @Entity @Table(indexes: [{name: "broken"}]) { id: ID }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MappingError::MissingArgument { ref argument, .. } if argument == "indexes[0].columns"
        ));
    }

    #[test]
    fn test_queries() {
        let metadata = evaluate(
            "User",
            r#"
            type User @Entity
                @NamedQueries(queries: [{name: "all", query: "SELECT u FROM User u"}])
                @NamedNativeQueries(queries: [{name: "raw", query: "SELECT * FROM users", resultSetMapping: "users"}])
                @SqlResultSetMappings(mappings: [{name: "users", entities: [{entityClass: "User"}], columns: [{name: "count"}]}])
            { id: ID }
            "#,
        )
        .unwrap();

        assert_eq!(metadata.named_queries[0].query, "SELECT u FROM User u");
        assert_eq!(
            metadata.named_native_queries[0].result_set_mapping.as_deref(),
            Some("users")
        );
        let mapping = &metadata.sql_result_set_mappings[0];
        assert_eq!(mapping.entities, vec![json!({"entityClass": "User"})]);
        assert_eq!(mapping.columns, vec![json!({"name": "count"})]);
    }

    #[test]
    fn test_named_query_requires_query() {
        let err = evaluate(
            "User",
            r#"type User @Entity @NamedQueries(queries: [{name: "all"}]) { id: ID }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MappingError::MissingArgument { ref directive, ref argument, .. }
                if directive == "NamedQueries" && argument == "queries[0].query"
        ));
    }

    #[test]
    fn test_inheritance_with_discriminator() {
        let metadata = evaluate(
            "Person",
            r#"
            type Person @Entity
                @Inheritance(type: "single_table")
                @Discriminator(column: "discr", map: [{alias: "person", class: "Person"}, {alias: "employee", class: "Employee"}])
            { id: ID }
            "#,
        )
        .unwrap();

        assert_eq!(metadata.inheritance_type(), InheritanceType::SingleTable);
        let column = metadata.discriminator_column.unwrap();
        assert_eq!(column.name, "discr");
        assert_eq!(column.type_name, "string");
        assert_eq!(column.length, Some(255));
        assert_eq!(metadata.discriminator_map.len(), 2);
        assert_eq!(metadata.discriminator_map["employee"], "Employee");
    }

    #[test]
    fn test_inheritance_without_discriminator() {
        let err = evaluate(
            "Person",
            r#"type Person @Entity @Inheritance(type: "SINGLE_TABLE") { id: ID }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MappingError::MissingDiscriminator { ref inheritance, .. } if inheritance == "SINGLE_TABLE"
        ));

        let metadata = evaluate("Person", r#"type Person @Entity @Inheritance(type: "NONE") { id: ID }"#)
            .unwrap();
        assert!(metadata.inheritance_type().is_none());
        assert!(metadata.discriminator_column.is_none());
    }

    #[test]
    fn test_change_tracking() {
        let metadata = evaluate(
            "User",
            r#"type User @Entity @ChangeTracking(policy: "notify") { id: ID }"#,
        )
        .unwrap();
        assert_eq!(metadata.change_tracking_policy, ChangeTrackingPolicy::Notify);

        let err = evaluate(
            "User",
            r#"type User @Entity @ChangeTracking(policy: "eventually") { id: ID }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MappingError::InvalidEnumValue { concept: "change tracking policy", .. }
        ));
    }

    #[test]
    fn test_column_attributes_verbatim() {
        let metadata = evaluate(
            "User",
            r#"
            type User @Entity {
                email: String @Column(name: "email_address", length: 180, unique: true, nullable: false)
                version: Int @Column(type: "integer") @Version
            }
            "#,
        )
        .unwrap();

        let email = metadata.get_field_mapping("email").unwrap();
        assert_eq!(email.column_name, "email_address");
        assert_eq!(email.type_name, "string");
        assert_eq!(email.length(), Some(180));
        assert!(email.is_unique());
        assert!(!email.is_nullable());
        assert_eq!(email.attribute("fieldName"), Some(&json!("email")));
        assert!(metadata.is_versioned());
        assert_eq!(metadata.version_field.as_deref(), Some("version"));
    }

    #[test]
    fn test_unknown_generator_strategy() {
        let err = evaluate(
            "User",
            r#"type User @Entity { id: ID @Column @Id @GeneratedValue(strategy: "random") }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MappingError::InvalidEnumValue { concept: "generator strategy", ref value, .. } if value == "random"
        ));
    }

    #[test]
    fn test_sequence_generator() {
        let metadata = evaluate(
            "User",
            r#"type User @Entity { id: ID @Column @Id @SequenceGenerator(sequenceName: "user_seq", allocationSize: 10) }"#,
        )
        .unwrap();
        assert_eq!(metadata.id_generator_type(), GeneratorType::Sequence);
        let definition = metadata.sequence_generator_definition.unwrap();
        assert_eq!(definition.get("sequenceName"), Some(&json!("user_seq")));
        assert_eq!(definition.get("allocationSize"), Some(&json!(10)));
    }

    #[test]
    fn test_explicit_strategy_kept_with_sequence_generator() {
        let metadata = evaluate(
            "User",
            r#"type User @Entity { id: ID @Column @Id @GeneratedValue(strategy: "IDENTITY") @SequenceGenerator(sequenceName: "s") }"#,
        )
        .unwrap();
        assert_eq!(metadata.id_generator_type(), GeneratorType::Identity);
        assert!(metadata.sequence_generator_definition.is_some());
    }

    #[test]
    fn test_custom_id_generator() {
        let metadata = evaluate(
            "User",
            r#"type User @Entity { id: ID @Column @Id @CustomIdGenerator(class: "App\\IdGenerator") }"#,
        )
        .unwrap();
        assert_eq!(metadata.id_generator_type(), GeneratorType::Custom);
        assert_eq!(
            metadata.custom_generator_definition.unwrap().class,
            "App\\IdGenerator"
        );
    }

    #[test]
    fn test_table_generator_always_fails() {
        let sources = [
            r#"type User @Entity { id: ID @Column @Id @TableGenerator(table: "ids") }"#,
            r#"type User @Entity { id: ID @Column @SequenceGenerator(sequenceName: "s") @TableGenerator }"#,
            r#"type User @Entity { author: ID @ManyToOne(targetEntity: "Author") @TableGenerator }"#,
            r#"type User @Entity { notes: String @TableGenerator }"#,
        ];
        for source in sources {
            let err = evaluate("User", source).unwrap_err();
            assert!(matches!(
                err,
                MappingError::GeneratorNotImplemented { generator: "table", .. }
            ));
        }
    }

    #[test]
    fn test_unmapped_field_contributes_nothing() {
        let metadata = evaluate(
            "User",
            "type User @Entity { id: ID @Column @Id computed: String @Deprecated }",
        )
        .unwrap();
        assert!(metadata.has_mapping("id"));
        assert!(!metadata.has_mapping("computed"));
        assert_eq!(metadata.field_mappings.len(), 1);
        assert!(metadata.association_mappings.is_empty());
        assert!(metadata.embedded_classes.is_empty());
    }

    #[test]
    fn test_join_requires_columns() {
        let err = evaluate(
            "Post",
            r#"type Post @Entity { author: ID @ManyToOne(targetEntity: "A") @Join }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MappingError::MissingJoinColumns { ref field, .. } if field == "author"
        ));
    }

    #[test]
    fn test_join_column_forms() {
        let metadata = evaluate(
            "Post",
            r#"type Post @Entity { author: ID @ManyToOne(targetEntity: "A") @Join(column: "author_id") }"#,
        )
        .unwrap();
        let author = metadata.get_association_mapping("author").unwrap();
        assert_eq!(author.join_columns, vec![JoinColumn::new("author_id")]);

        let metadata = evaluate(
            "Post",
            r#"type Post @Entity { author: ID @ManyToOne(targetEntity: "A") @Join(columns: ["a_id", "b_id"]) }"#,
        )
        .unwrap();
        let author = metadata.get_association_mapping("author").unwrap();
        assert_eq!(author.kind, AssociationKind::ManyToOne);
        assert_eq!(author.target_entity, "A");
        assert_eq!(author.join_columns.len(), 2);
        assert_eq!(author.join_columns[1].name, "b_id");

        let metadata = evaluate(
            "Post",
            r#"
            type Post @Entity {
                author: ID @ManyToOne(targetEntity: "A")
                    @Join(column: {name: "author_id", referencedColumnName: "uid", nullable: false, onDelete: "CASCADE"})
            }
            "#,
        )
        .unwrap();
        let column = &metadata.get_association_mapping("author").unwrap().join_columns[0];
        assert_eq!(column.referenced_column_name.as_deref(), Some("uid"));
        assert!(!column.nullable);
        assert_eq!(column.on_delete.as_deref(), Some("CASCADE"));
    }

    #[test]
    fn test_one_to_many_with_order_by() {
        let metadata = evaluate(
            "User",
            r#"
            type User @Entity {
                posts: [Post] @OneToMany(targetEntity: "Post", mappedBy: "author", cascade: ["PERSIST", "remove"], fetch: "extra_lazy", indexBy: "slug")
                    @OrderBy(publishedAt: "DESC", title: "asc")
            }
            "#,
        )
        .unwrap();

        let posts = metadata.get_association_mapping("posts").unwrap();
        assert_eq!(posts.kind, AssociationKind::OneToMany);
        assert_eq!(posts.mapped_by.as_deref(), Some("author"));
        assert_eq!(posts.cascade, vec!["persist", "remove"]);
        assert_eq!(posts.fetch, FetchMode::ExtraLazy);
        assert_eq!(posts.index_by.as_deref(), Some("slug"));
        assert_eq!(
            posts.order_by,
            vec![OrderBy::desc("publishedAt"), OrderBy::asc("title")]
        );
        assert!(!posts.is_owning_side());
    }

    #[test]
    fn test_one_to_many_requires_mapped_by() {
        let err = evaluate(
            "User",
            r#"type User @Entity { posts: [Post] @OneToMany(targetEntity: "Post") }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MappingError::MissingArgument { ref argument, .. } if argument == "mappedBy"
        ));
    }

    #[test]
    fn test_invalid_fetch_and_order_direction() {
        let err = evaluate(
            "User",
            r#"type User @Entity { profile: Profile @OneToOne(targetEntity: "Profile", fetch: "sometimes") }"#,
        )
        .unwrap_err();
        assert!(matches!(err, MappingError::InvalidEnumValue { concept: "fetch mode", .. }));

        let err = evaluate(
            "User",
            r#"type User @Entity { posts: [Post] @OneToMany(targetEntity: "Post", mappedBy: "a") @OrderBy(title: "UP") }"#,
        )
        .unwrap_err();
        assert!(matches!(err, MappingError::InvalidEnumValue { concept: "order direction", .. }));
    }

    #[test]
    fn test_conflicting_association_sides() {
        let err = evaluate(
            "User",
            r#"type User @Entity { profile: Profile @OneToOne(targetEntity: "Profile", mappedBy: "user", inversedBy: "owner") }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MappingError::ConflictingAssociationSides { ref field, .. } if field == "profile"
        ));
    }

    #[test]
    fn test_one_to_one_identifier() {
        let metadata = evaluate(
            "Profile",
            r#"type Profile @Entity { user: User @OneToOne(targetEntity: "User", inversedBy: "profile", orphanRemoval: true) @Id @Join(column: "user_id") }"#,
        )
        .unwrap();
        let user = metadata.get_association_mapping("user").unwrap();
        assert!(user.id);
        assert!(user.orphan_removal);
        assert!(user.is_owning_side());
        assert_eq!(metadata.identifier, vec!["user"]);
    }

    #[test]
    fn test_many_to_one_identifier() {
        let metadata = evaluate(
            "OrderLine",
            r#"
            type OrderLine @Entity {
                order: Order @ManyToOne(targetEntity: "Order", inversedBy: "lines") @Id @Join(column: "order_id")
                position: Int @Column(type: "integer") @Id
            }
            "#,
        )
        .unwrap();
        let order = metadata.get_association_mapping("order").unwrap();
        assert_eq!(order.kind, AssociationKind::ManyToOne);
        assert!(order.id);
        assert_eq!(order.join_columns, vec![JoinColumn::new("order_id")]);
        assert_eq!(metadata.identifier, vec!["order", "position"]);
        assert!(metadata.is_identifier_composite());
    }

    #[test]
    fn test_many_to_many_join_table() {
        let metadata = evaluate(
            "User",
            r#"
            type User @Entity @Cache(usage: "READ_WRITE", region: "users") {
                groups: [Group] @ManyToMany(targetEntity: "Group", inversedBy: "users")
                    @JoinTable(
                        name: "users_groups",
                        joinColumns: [{name: "user_id", referencedColumnName: "id"}],
                        inverseJoinColumns: ["group_id"]
                    )
                    @Cache
            }
            "#,
        )
        .unwrap();

        let groups = metadata.get_association_mapping("groups").unwrap();
        let table = groups.join_table.as_ref().unwrap();
        assert_eq!(table.name.as_deref(), Some("users_groups"));
        assert_eq!(
            table.join_columns,
            vec![JoinColumn::new("user_id").references("id")]
        );
        assert_eq!(table.inverse_join_columns, vec![JoinColumn::new("group_id")]);
        assert_eq!(
            groups.cache,
            Some(CacheDescriptor::new(CacheUsage::ReadWrite, "users__groups"))
        );
    }

    #[test]
    fn test_association_cache_override() {
        let metadata = evaluate(
            "User",
            r#"type User @Entity { roles: [Role] @ManyToMany(targetEntity: "Role") @Cache(usage: "nonstrict_read_write", region: "roles") }"#,
        )
        .unwrap();
        assert_eq!(
            metadata.get_association_mapping("roles").unwrap().cache,
            Some(CacheDescriptor::new(CacheUsage::NonstrictReadWrite, "roles"))
        );
    }

    #[test]
    fn test_field_cache_usage_is_validated() {
        let err = evaluate(
            "User",
            r#"type User @Entity { roles: [Role] @ManyToMany(targetEntity: "Role") @Cache(usage: "sometimes") }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MappingError::InvalidCacheUsage { ref class, ref usage } if class == "User" && usage == "sometimes"
        ));
    }

    #[test]
    fn test_column_cache_is_kept_in_attributes() {
        let metadata = evaluate(
            "User",
            r#"type User @Entity { a: ID @Column @Cache(usage: "read_write") }"#,
        )
        .unwrap();
        assert_eq!(
            metadata.get_field_mapping("a").unwrap().attribute("cache"),
            Some(&json!({"usage": "READ_WRITE", "region": "user__a"}))
        );
    }

    #[test]
    fn test_null_join_column_counts_as_absent() {
        let err = evaluate(
            "Post",
            r#"type Post @Entity { author: ID @ManyToOne(targetEntity: "A") @Join(column: null) }"#,
        )
        .unwrap_err();
        assert!(matches!(err, MappingError::MissingJoinColumns { .. }));
    }

    #[test]
    fn test_embedded_column_prefix() {
        let metadata = evaluate(
            "User",
            r#"
            type User @Entity {
                address: Address @Embedded(class: "Address")
                billing: Address @Embedded(class: "Address", columnPrefix: "bill_")
                shipping: Address @Embedded(class: "Address", columnPrefix: false)
            }
            "#,
        )
        .unwrap();
        assert_eq!(
            metadata.get_embedded_mapping("address").unwrap().column_prefix,
            ColumnPrefix::Default
        );
        assert_eq!(
            metadata.get_embedded_mapping("billing").unwrap().column_prefix,
            ColumnPrefix::Custom("bill_".to_string())
        );
        assert_eq!(
            metadata.get_embedded_mapping("shipping").unwrap().column_prefix,
            ColumnPrefix::Disabled
        );
    }

    #[test]
    fn test_column_wins_over_association() {
        let metadata = evaluate(
            "Post",
            r#"type Post @Entity { author: ID @ManyToOne(targetEntity: "A") @Column(name: "author") }"#,
        )
        .unwrap();
        assert!(metadata.get_field_mapping("author").is_some());
        assert!(metadata.get_association_mapping("author").is_none());
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let source = r#"
            type User @Entity @Table(name: "users") @Cache(usage: "read_write") {
                id: ID @Column(type: "integer") @Id @GeneratedValue
                posts: [Post] @OneToMany(targetEntity: "Post", mappedBy: "author") @OrderBy(id: "ASC")
                author: User @ManyToOne(targetEntity: "User") @Join(columns: ["a", "b"])
                address: Address @Embedded(class: "Address")
            }
        "#;
        let first = evaluate("User", source).unwrap();
        let second = evaluate("User", source).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
