//! Turns the modeling tool's JSON tree into the crate's models.

mod property_index;
mod raw;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::activation::is_active;
use crate::helpers::non_blank;
use crate::model_reader::property_index::PropertyIndex;
use crate::model_reader::raw::{
    RawCompositeKey, RawEntity, RawEntityDetails, RawFieldReference, RawIndex, RawKeyOptions, RawKeyReference,
    RawModel, RawProperty, RawRelationship, RawView, RawViewDetails, RawViewKey,
};
use crate::models::{
    default_type_for, CheckConstraint, ColumnType, ColumnValueSource, DefaultValue, HanaColumn, HanaDataType,
    HanaForeignKey, HanaIndex, HanaSchema, HanaTable, HanaView, IdentityGeneration, IdentitySpec, IndexKey,
    InlineKey, KeyColumn, KeyConstraint, KeyOptions, KeyType, SortDirection, StorageMode, TableOptions,
    TemporaryMode, ViewKey,
};
use crate::quoting::qualified_name;
use crate::Result;

/// Everything one script is generated from.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct HanaModel {
    pub schema: Option<HanaSchema>,
    pub tables: Vec<HanaTable>,
    pub views: Vec<HanaView>,
    /// Foreign keys between tables of this model.
    pub relationships: Vec<HanaForeignKey>,
}

impl HanaModel {
    pub fn schema_name(&self) -> Option<&str> {
        self.schema.as_ref().map(|s| s.name.as_str())
    }
}

/// Reads a whole model: container, entities, views and relationships.
#[instrument(skip_all)]
pub fn read_model(json: &str) -> Result<HanaModel> {
    let raw: RawModel = serde_json::from_str(json)?;
    ModelReader::hydrate(raw)
}

/// Reads a single view definition. A view without a name yields `None`.
pub fn read_view(json: &str, schema_name: Option<&str>) -> Result<Option<HanaView>> {
    let raw: RawView = serde_json::from_str(json)?;
    let reader = ModelReader {
        schema_name: non_blank(schema_name).map(str::to_string),
    };
    Ok(reader.hydrate_view(&raw))
}

struct ModelReader {
    schema_name: Option<String>,
}

impl ModelReader {
    fn hydrate(raw: RawModel) -> Result<HanaModel> {
        let schema = raw.container_data.first().and_then(|container| {
            non_blank(container.name.as_deref()).map(|name| HanaSchema {
                name: name.to_string(),
                is_activated: is_active(container.is_activated),
            })
        });

        let reader = ModelReader {
            schema_name: schema.as_ref().map(|s| s.name.clone()),
        };

        let mut tables = Vec::with_capacity(raw.entities.len());
        for entity in &raw.entities {
            if let Some(table) = reader.hydrate_table(entity, &raw.entities)? {
                tables.push(table);
            }
        }

        let views = raw.views.iter().filter_map(|v| reader.hydrate_view(v)).collect();

        let relationships = raw
            .relationships
            .iter()
            .filter_map(|r| reader.hydrate_relationship(r, &tables))
            .collect();

        let model = HanaModel {
            schema,
            tables,
            views,
            relationships,
        };

        debug!(
            tables = model.tables.len(),
            views = model.views.len(),
            relationships = model.relationships.len(),
            "Read model"
        );

        Ok(model)
    }

    fn hydrate_table(&self, entity: &RawEntity, entities: &[RawEntity]) -> Result<Option<HanaTable>> {
        let Some(name) = entity_name(entity) else {
            warn!("Skipping entity without a name");
            return Ok(None);
        };

        let Some(properties) = entity.properties.as_deref() else {
            debug!(table = name, "Skipping entity without properties");
            return Ok(None);
        };

        let index = PropertyIndex::build(name, properties);
        let details = entity.entity_level.as_ref();

        let mut table = HanaTable {
            schema_name: self.schema_name.clone(),
            columns: properties
                .iter()
                .map(|(column_name, property)| self.hydrate_column(column_name, property))
                .collect(),
            key_constraints: hydrate_key_constraints(properties, entity, &index)?,
            is_activated: is_active(entity.is_activated),
            ..HanaTable::new(name)
        };

        // Columns of any primary key can't be null.
        for key in table.key_constraints.iter().filter(|k| k.key_type == KeyType::PrimaryKey) {
            for key_column in &key.columns {
                if let Some(column) = table.columns.iter_mut().find(|c| c.name == key_column.name) {
                    column.is_nullable = false;
                }
            }
        }

        if let Some(details) = details {
            apply_entity_details(&mut table, details, &index)?;
            if details.auxiliary {
                self.apply_auxiliary_options(&mut table.options, details, entities);
            }
        }

        Ok(Some(table))
    }

    /// The base table of an auxiliary table is another entity of the model, referenced by
    /// identifier, and its base column a property of that entity.
    fn apply_auxiliary_options(&self, options: &mut TableOptions, details: &RawEntityDetails, entities: &[RawEntity]) {
        let base_id = non_blank(details.auxiliary_base_table.as_deref());
        let base = base_id.and_then(|id| entities.iter().find(|e| e.guid.as_deref() == Some(id)));
        if base.is_none() && base_id.is_some() {
            warn!(base_table = ?base_id, "Auxiliary base table is not part of the model");
        }

        options.auxiliary_base_table = base
            .and_then(entity_name)
            .map(|name| qualified_name(self.schema_name.as_deref(), name));
        options.auxiliary_base_column = base
            .and_then(|b| b.properties.as_deref())
            .zip(details.auxiliary_base_column.first())
            .and_then(|(properties, key)| {
                properties
                    .iter()
                    .find(|(_, p)| p.guid.as_deref() == Some(key.key_id.as_str()))
                    .map(|(name, _)| name.clone())
            });
        options.auxiliary_append = non_blank(details.auxiliary_append.as_deref()).map(str::to_string);
        options.auxiliary_part = details.auxiliary_part;
    }

    fn hydrate_column(&self, name: &str, property: &RawProperty) -> HanaColumn {
        let data_type = match (
            non_blank(property.reference.as_deref()),
            non_blank(property.mode.as_deref()),
            non_blank(property.property_type.as_deref()),
        ) {
            (Some(reference), _, _) => {
                let type_name = reference.rsplit('/').next().unwrap_or(reference);
                HanaDataType::UserDefined(type_name.to_string())
            }
            (None, Some(mode), _) => HanaDataType::from_name(mode),
            (None, None, Some(logical_type)) => default_type_for(logical_type),
            (None, None, None) => HanaDataType::Nvarchar,
        };

        let udt_schema = match data_type {
            HanaDataType::UserDefined(_) => self.schema_name.clone(),
            _ => None,
        };

        let column_type = ColumnType {
            length: property.length,
            precision: property.precision,
            scale: property.scale,
            dimension: property.dimension,
            srid: property.srid,
            udt_schema,
            ..ColumnType::new(data_type)
        };

        HanaColumn {
            column_type,
            is_nullable: property.required != Some(true),
            value_source: get_value_source(property),
            inline_key: get_inline_key(property),
            comment: non_blank(property.ref_description.as_deref())
                .or(non_blank(property.description.as_deref()))
                .map(str::to_string),
            is_activated: is_active(property.is_activated),
            ..HanaColumn::new(name, HanaDataType::Nvarchar)
        }
    }

    fn hydrate_view(&self, raw: &RawView) -> Option<HanaView> {
        let Some(name) = non_blank(raw.name.as_deref()) else {
            warn!("Skipping view without a name");
            return None;
        };

        let keys = raw.keys.iter().filter_map(|k| self.hydrate_view_key(k)).collect();

        let mut view = HanaView {
            schema_name: self.schema_name.clone(),
            keys,
            is_activated: is_active(raw.is_activated),
            ..HanaView::new(name)
        };

        if let Some(RawViewDetails {
            or_replace,
            select_statement,
            description,
            view_properties,
        }) = &raw.entity_level
        {
            view.or_replace = *or_replace;
            view.select_statement = non_blank(select_statement.as_deref()).map(str::to_string);
            view.comment = non_blank(description.as_deref()).map(str::to_string);
            view.view_properties = non_blank(view_properties.as_deref()).map(str::to_string);
        }

        Some(view)
    }

    fn hydrate_view_key(&self, key: &RawViewKey) -> Option<ViewKey> {
        let name = non_blank(key.name.as_deref())?;
        let alias = non_blank(key.alias.as_deref()).map(str::to_string);

        Some(match non_blank(key.entity_name.as_deref()) {
            Some(table_name) => ViewKey::Column {
                schema_name: non_blank(key.db_name.as_deref())
                    .map(str::to_string)
                    .or_else(|| self.schema_name.clone()),
                table_name: table_name.to_string(),
                name: name.to_string(),
                alias,
                is_activated: is_active(key.is_activated),
            },
            None => ViewKey::Expression {
                expression: name.to_string(),
                alias,
            },
        })
    }

    fn hydrate_relationship(&self, raw: &RawRelationship, tables: &[HanaTable]) -> Option<HanaForeignKey> {
        let (Some(child_table), Some(parent_table)) = (
            non_blank(raw.child_collection.as_deref()),
            non_blank(raw.parent_collection.as_deref()),
        ) else {
            warn!(relationship = ?raw.name, "Skipping relationship without both tables");
            return None;
        };

        let child = tables.iter().find(|t| t.name == child_table);
        let parent = tables.iter().find(|t| t.name == parent_table);
        let schema_of = |db_name: &Option<String>| {
            non_blank(db_name.as_deref())
                .map(str::to_string)
                .or_else(|| self.schema_name.clone())
        };

        Some(HanaForeignKey {
            name: non_blank(raw.name.as_deref()).map(str::to_string),
            child_schema: schema_of(&raw.child_db_name),
            child_columns: raw.child_field.iter().map(|f| field_to_key_column(f, child)).collect(),
            parent_schema: schema_of(&raw.parent_db_name),
            parent_columns: raw.parent_field.iter().map(|f| field_to_key_column(f, parent)).collect(),
            on_delete: non_blank(raw.custom_properties.relationship_on_delete.as_deref()).map(str::to_string),
            on_update: non_blank(raw.custom_properties.relationship_on_update.as_deref()).map(str::to_string),
            parent_activated: parent.map_or(true, |t| t.is_activated),
            child_activated: child.map_or(true, |t| t.is_activated),
            ..HanaForeignKey::new(child_table, parent_table)
        })
    }
}

/// A field given by name takes its activation from the column of the same name in `table`.
fn entity_name(entity: &RawEntity) -> Option<&str> {
    non_blank(entity.collection_name.as_deref()).or(non_blank(entity.name.as_deref()))
}

fn field_to_key_column(field: &RawFieldReference, table: Option<&HanaTable>) -> KeyColumn {
    match field {
        RawFieldReference::Name(name) => KeyColumn {
            name: name.clone(),
            is_activated: table
                .and_then(|t| t.columns.iter().find(|c| &c.name == name))
                .map_or(true, |c| c.is_activated),
        },
        RawFieldReference::Field { name, is_activated } => KeyColumn {
            name: name.clone(),
            is_activated: is_active(*is_activated),
        },
    }
}

fn get_value_source(property: &RawProperty) -> ColumnValueSource {
    if let Some(identity) = &property.identity {
        if let Some(generated) = identity.generated.as_deref().and_then(IdentityGeneration::parse) {
            return ColumnValueSource::Identity(IdentitySpec {
                start: identity.start,
                increment: identity.increment,
                min_value: identity.min_value,
                max_value: identity.max_value,
                cycle: non_blank(identity.cycle.as_deref()).map(str::to_string),
                ..IdentitySpec::new(generated)
            });
        }
    }

    match &property.default {
        Some(Value::String(text)) if !text.is_empty() => ColumnValueSource::Default(DefaultValue::Text(text.clone())),
        Some(Value::Number(number)) => ColumnValueSource::Default(DefaultValue::Number(number.to_string())),
        Some(Value::Bool(flag)) => ColumnValueSource::Default(DefaultValue::Number(flag.to_string().to_uppercase())),
        _ => ColumnValueSource::None,
    }
}

fn to_key_options(options: Option<&RawKeyOptions>) -> KeyOptions {
    let Some(options) = options else {
        return KeyOptions::default();
    };
    let owned = |value: &Option<String>| non_blank(value.as_deref()).map(str::to_string);

    KeyOptions {
        defer_clause: owned(&options.defer_clause),
        rely: owned(&options.rely),
        index_clause: owned(&options.index_clause),
        validate: owned(&options.validate),
        exception_clause: owned(&options.exception_clause),
    }
}

fn constraint_name(options: Option<&RawKeyOptions>) -> Option<&str> {
    options.and_then(|o| non_blank(o.constraint_name.as_deref()))
}

fn is_primary_key_column(property: &RawProperty) -> bool {
    property.primary_key && !property.composite_primary_key && !property.composite_unique_key
}

fn is_unique_key_column(property: &RawProperty) -> bool {
    property.unique && !property.composite_primary_key && !property.composite_unique_key
}

/// Unnamed single column keys stay on the column; a primary key takes precedence over unique.
fn get_inline_key(property: &RawProperty) -> InlineKey {
    let pk_options = property.primary_key_options.as_ref();
    let unique_options = property.unique_key_options.as_ref();

    if is_primary_key_column(property) {
        if constraint_name(pk_options).is_none() {
            return InlineKey::PrimaryKey(to_key_options(pk_options));
        }
    } else if is_unique_key_column(property) && constraint_name(unique_options).is_none() {
        return InlineKey::Unique(to_key_options(unique_options));
    }

    InlineKey::None
}

/// Table level keys in order: named column primary keys, composite primary keys,
/// named column unique keys, composite unique keys.
fn hydrate_key_constraints(
    properties: &[(String, RawProperty)],
    entity: &RawEntity,
    index: &PropertyIndex,
) -> Result<Vec<KeyConstraint>> {
    let named_column_keys = |key_type: KeyType| {
        properties
            .iter()
            .filter_map(move |(name, property)| {
                let (eligible, options) = match key_type {
                    KeyType::PrimaryKey => (is_primary_key_column(property), property.primary_key_options.as_ref()),
                    KeyType::Unique => (
                        is_unique_key_column(property) && !is_primary_key_column(property),
                        property.unique_key_options.as_ref(),
                    ),
                };
                let constraint_name = constraint_name(options).filter(|_| eligible)?;

                Some(KeyConstraint {
                    constraint_name: Some(constraint_name.to_string()),
                    options: to_key_options(options),
                    ..KeyConstraint::new(
                        key_type,
                        vec![KeyColumn {
                            name: name.clone(),
                            is_activated: is_active(property.is_activated),
                        }],
                    )
                })
            })
            .collect::<Vec<_>>()
    };

    let mut keys = named_column_keys(KeyType::PrimaryKey);
    keys.extend(composite_keys(KeyType::PrimaryKey, &entity.primary_key, index)?);
    keys.extend(named_column_keys(KeyType::Unique));
    keys.extend(composite_keys(KeyType::Unique, &entity.unique_key, index)?);

    Ok(keys)
}

fn composite_keys(key_type: KeyType, keys: &[RawCompositeKey], index: &PropertyIndex) -> Result<Vec<KeyConstraint>> {
    let mut constraints = Vec::new();

    for key in keys {
        let references = match key_type {
            KeyType::PrimaryKey => &key.composite_primary_key,
            KeyType::Unique => &key.composite_unique_key,
        };
        if references.is_empty() {
            continue;
        }

        let columns = references
            .iter()
            .map(|r| index.resolve(&r.key_id))
            .collect::<Result<Vec<_>>>()?;

        constraints.push(KeyConstraint {
            constraint_name: constraint_name(Some(&key.options)).map(str::to_string),
            options: to_key_options(Some(&key.options)),
            ..KeyConstraint::new(key_type, columns)
        });
    }

    Ok(constraints)
}

fn apply_entity_details(table: &mut HanaTable, details: &RawEntityDetails, index: &PropertyIndex) -> Result {
    let owned = |value: &Option<String>| non_blank(value.as_deref()).map(str::to_string);

    table.storage_mode = if details.row_store || details.column_store == Some(false) {
        StorageMode::Row
    } else {
        StorageMode::Column
    };
    table.temporary_mode = if details.global_temporary {
        TemporaryMode::Global
    } else if details.temporary {
        TemporaryMode::Local
    } else {
        TemporaryMode::None
    };
    table.options = TableOptions {
        select_statement: owned(&details.select_statement),
        under_super_table: owned(&details.under_super_table),
        table_properties: owned(&details.table_properties),
        tablespace: owned(&details.tablespace_name),
        partition_spec: owned(&details.partition_spec),
        ..Default::default()
    };
    table.comment = owned(&details.description);
    table.if_not_exists = details.if_not_exist;

    table.check_constraints = details
        .chk_constr
        .iter()
        .filter_map(|check| {
            non_blank(check.constr_expression.as_deref())
                .map(|expression| CheckConstraint::new(non_blank(check.chk_constr_name.as_deref()), expression))
        })
        .collect();

    table.indexes = details
        .indexes
        .iter()
        .map(|raw| hydrate_index(raw, index))
        .collect::<Result<Vec<_>>>()?;

    Ok(())
}

fn hydrate_index(raw: &RawIndex, index: &PropertyIndex) -> Result<HanaIndex> {
    let keys = |references: &[RawKeyReference]| {
        references
            .iter()
            .map(|r| -> Result<IndexKey> {
                let column = index.resolve(&r.key_id)?;
                Ok(IndexKey {
                    name: column.name,
                    direction: r.key_type.as_deref().and_then(SortDirection::parse),
                    is_activated: column.is_activated,
                })
            })
            .collect::<Result<Vec<_>>>()
    };
    let owned = |value: &Option<String>| non_blank(value.as_deref()).map(str::to_string);

    Ok(HanaIndex {
        name: owned(&raw.indx_name),
        index_type: owned(&raw.indx_type),
        keys: keys(&raw.indx_key)?,
        include_keys: keys(&raw.indx_include_key)?,
        compress: owned(&raw.indx_compress),
        null_keys: owned(&raw.indx_null_keys),
        tablespace: owned(&raw.indx_tablespace),
        comment: owned(&raw.indx_description),
        is_activated: is_active(raw.is_activated),
    })
}
