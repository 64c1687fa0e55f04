//! Embeddable entity discovery.

use super::reader::{Embeddable, MetadataReader, Property};
use crate::definition::{EntityDef, FieldDef};
use crate::error::{Result, SchemaError};
use crate::generator::Generator;
use crate::registry::Registry;
use heck::ToLowerCamelCase;
use tracing::debug;

/// Registers an entity for every embeddable class among a fixed list of
/// candidates.
///
/// Embeddables are value objects: a candidate declaring a relation aborts
/// the step. Every generated column carries the embeddable's column prefix
/// so the same embeddable can be inlined into several tables.
#[derive(Debug)]
pub struct Embeddings<R> {
    classes: Vec<String>,
    reader: R,
}

impl<R: MetadataReader> Embeddings<R> {
    /// Create the step for the given candidate classes.
    pub fn new<I, S>(classes: I, reader: R) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
            reader,
        }
    }

    /// Candidate classes.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    fn read<T>(
        &self,
        class: &str,
        read: impl FnOnce(&R) -> std::result::Result<T, crate::error::MetadataError>,
    ) -> Result<T> {
        read(&self.reader).map_err(|err| SchemaError::metadata(class, err))
    }
}

impl<R: MetadataReader> Generator for Embeddings<R> {
    fn name(&self) -> &str {
        "embeddings"
    }

    fn run(&self, registry: &mut Registry) -> Result<()> {
        for class in &self.classes {
            let Some(embeddable) = self.read(class, |r| r.embeddable(class))? else {
                continue;
            };
            let properties = self.read(class, |r| r.properties(class))?;

            let mut entity = init_embedding(&embeddable, class);
            verify_no_relations(&entity, &properties)?;
            init_fields(&mut entity, &properties, &embeddable.column_prefix);

            debug!(
                role = %entity.role,
                class = %entity.class,
                fields = entity.fields.len(),
                "registering embeddable"
            );
            registry.register(entity)?;
        }

        Ok(())
    }
}

fn init_embedding(embeddable: &Embeddable, class: &str) -> EntityDef {
    let mut entity = EntityDef::new(String::new(), class);
    entity.role = match &embeddable.role {
        Some(role) => role.clone(),
        None => entity.short_name().to_lower_camel_case(),
    };
    entity.mapper = embeddable.mapper.clone();
    entity
}

fn verify_no_relations(entity: &EntityDef, properties: &[Property]) -> Result<()> {
    if properties.iter().any(Property::has_relation) {
        return Err(SchemaError::RelationInEmbeddable {
            class: entity.class.clone(),
        });
    }
    Ok(())
}

fn init_fields(entity: &mut EntityDef, properties: &[Property], column_prefix: &str) {
    for property in properties {
        let Some(column) = property.column_annotation() else {
            continue;
        };

        let mut field = FieldDef::new(column.name.as_deref().unwrap_or(&property.name))
            .with_column_prefix(column_prefix);
        field.primary = column.primary;
        field.referenced = column.referenced || column.primary;
        field.typecast = column.typecast.clone();

        entity.fields.insert(property.name.clone(), field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotated::{Annotation, ClassMetadata, Column, MemoryReader};
    use crate::definition::{RelationKind, Typecast};
    use crate::error::MetadataError;

    fn address_properties() -> Vec<Property> {
        vec![
            Property::new("city").column(),
            Property::new("zipCode").with(Annotation::Column(Column {
                name: Some("zip".into()),
                typecast: Some(Typecast::named("string")),
                ..Column::default()
            })),
            Property::new("cache"),
        ]
    }

    fn reader() -> MemoryReader {
        MemoryReader::new()
            .with_embeddable(
                "app::value::PostalAddress",
                Embeddable::new("addr_"),
                address_properties(),
            )
            .with_class("app::entity::User", ClassMetadata::default())
    }

    #[test]
    fn test_registers_embeddable_with_prefixed_columns() {
        let step = Embeddings::new(["app::value::PostalAddress"], reader());
        let mut registry = Registry::new();
        step.run(&mut registry).unwrap();

        let entity = registry.find("postalAddress").unwrap();
        assert_eq!(entity.class, "app::value::PostalAddress");
        assert_eq!(entity.field("city").unwrap().column, "addr_city");
        assert_eq!(entity.field("zipCode").unwrap().column, "addr_zip");
        assert_eq!(
            entity.field("zipCode").unwrap().typecast,
            Some(Typecast::named("string"))
        );
        assert!(entity.field("cache").is_none());
    }

    #[test]
    fn test_explicit_role_and_mapper() {
        let reader = MemoryReader::new().with_embeddable(
            "app::Money",
            Embeddable::new("")
                .with_role("price")
                .with_mapper("app::mapper::MoneyMapper"),
            vec![Property::new("amount").column()],
        );
        let mut registry = Registry::new();
        Embeddings::new(["app::Money"], reader)
            .run(&mut registry)
            .unwrap();

        let entity = registry.find("price").unwrap();
        assert_eq!(entity.mapper.as_deref(), Some("app::mapper::MoneyMapper"));
        assert_eq!(entity.field("amount").unwrap().column, "amount");
    }

    #[test]
    fn test_non_embeddable_candidates_are_ignored() {
        let mut registry = Registry::new();
        Embeddings::new(["app::entity::User"], reader())
            .run(&mut registry)
            .unwrap();

        assert!(registry.is_empty());
    }

    #[test]
    fn test_relation_in_embeddable_is_rejected() {
        let reader = MemoryReader::new().with_embeddable(
            "app::value::Address",
            Embeddable::new("addr_"),
            vec![
                Property::new("city").column(),
                Property::new("owner").with(Annotation::Relation {
                    kind: RelationKind::BelongsTo,
                    target: "user".into(),
                }),
            ],
        );

        let mut registry = Registry::new();
        let err = Embeddings::new(["app::value::Address"], reader)
            .run(&mut registry)
            .unwrap_err();

        assert!(matches!(
            err,
            SchemaError::RelationInEmbeddable { ref class } if class == "app::value::Address"
        ));
        assert!(registry.is_empty());
    }

    type ReadResult<T> = std::result::Result<T, MetadataError>;

    struct BrokenReader;

    impl MetadataReader for BrokenReader {
        fn embeddable(&self, _class: &str) -> ReadResult<Option<Embeddable>> {
            Err(MetadataError::new("unexpected token `)`"))
        }

        fn properties(&self, _class: &str) -> ReadResult<Vec<Property>> {
            Ok(Vec::new())
        }
    }

    struct BrokenPropertiesReader;

    impl MetadataReader for BrokenPropertiesReader {
        fn embeddable(&self, _class: &str) -> ReadResult<Option<Embeddable>> {
            Ok(Some(Embeddable::new("addr_")))
        }

        fn properties(&self, _class: &str) -> ReadResult<Vec<Property>> {
            Err(MetadataError::new("unknown annotation `@Colum`"))
        }
    }

    #[test]
    fn test_reader_failure_names_class() {
        let mut registry = Registry::new();
        let err = Embeddings::new(["app::Broken"], BrokenReader)
            .run(&mut registry)
            .unwrap_err();

        match err {
            SchemaError::Metadata { class, source } => {
                assert_eq!(class, "app::Broken");
                assert_eq!(source.message, "unexpected token `)`");
            }
            other => panic!("expected metadata error, got {other:?}"),
        }
    }

    #[test]
    fn test_properties_failure_names_class() {
        let mut registry = Registry::new();
        registry
            .register(EntityDef::new("user", "app::User"))
            .unwrap();

        let err = Embeddings::new(["app::value::Address"], BrokenPropertiesReader)
            .run(&mut registry)
            .unwrap_err();

        assert!(err.to_string().contains("`app::value::Address`"));
        assert!(matches!(
            err,
            SchemaError::Metadata { ref class, ref source }
                if class == "app::value::Address" && source.message.contains("@Colum")
        ));
        let roles: Vec<_> = registry.iter().map(|e| e.role.as_str()).collect();
        assert_eq!(roles, vec!["user"]);
    }
}
