mod names;
mod queries;
mod reconstruct;
mod rows;

use futures::try_join;
use tracing::{debug, info, instrument};

pub use names::{get_view_name, is_view_name, set_view_sign};
pub use queries::{clean_up_query, CollectionKind, SYSTEM_SCHEMAS};
pub use reconstruct::{CatalogSnapshot, TableCatalog, ViewCatalog};
pub use rows::*;

use crate::connection::{HanaConnection, HanaSession};
use crate::Result;

/// Tables and views of one schema. View names carry the ` (v)` suffix.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DbCollections {
    pub db_name: String,
    pub db_collections: Vec<String>,
    pub is_empty: bool,
}

/// Reads metadata from the `SYS` catalog views of an open session.
pub struct CatalogReader<'a, C: HanaConnection> {
    session: &'a HanaSession<C>,
    include_system_collection: bool,
}

impl<'a, C: HanaConnection> CatalogReader<'a, C> {
    pub fn new(session: &'a HanaSession<C>) -> Self {
        CatalogReader {
            session,
            include_system_collection: false,
        }
    }

    pub fn with_system_collections(mut self, include_system_collection: bool) -> Self {
        self.include_system_collection = include_system_collection;
        self
    }

    /// The database version, empty when the catalog doesn't report one.
    pub async fn get_db_version(&self) -> Result<String> {
        let rows: Vec<DbVersionRow> = self.session.get_results(&queries::get_db_version_query()).await?;
        Ok(rows.into_iter().next().map(|r| r.version).unwrap_or_default())
    }

    pub async fn get_schema_names(&self) -> Result<Vec<String>> {
        let rows: Vec<SchemaNameRow> = self
            .session
            .get_results(&queries::get_schemas_query(self.include_system_collection))
            .await?;

        Ok(rows.into_iter().map(|r| r.schema_name).collect())
    }

    pub async fn get_schema_properties(&self, schema_name: &str) -> Result<Option<SchemaPropertiesRow>> {
        let rows: Vec<SchemaPropertiesRow> = self.session.get_results(&queries::get_schema_query(schema_name)).await?;
        Ok(rows.into_iter().next())
    }

    /// Tables and views grouped per schema. Schemas holding only views come after those with tables.
    #[instrument(skip_all)]
    pub async fn get_collection_names(&self) -> Result<Vec<DbCollections>> {
        info!("Get table and schema names");

        let table_query = queries::get_table_names_query(CollectionKind::Table, self.include_system_collection);
        let view_query = queries::get_table_names_query(CollectionKind::View, self.include_system_collection);

        let (tables, views): (Vec<TableNameRow>, Vec<TableNameRow>) =
            try_join!(self.session.get_results(&table_query), self.session.get_results(&view_query))?;

        let mut collections: Vec<DbCollections> = Vec::new();
        let names = tables
            .into_iter()
            .map(|r| (r.schema_name, r.table_name))
            .chain(views.into_iter().map(|r| (r.schema_name, set_view_sign(&r.table_name))));

        for (schema_name, name) in names {
            match collections.iter_mut().find(|c| c.db_name == schema_name) {
                Some(collection) => collection.db_collections.push(name),
                None => collections.push(DbCollections {
                    db_name: schema_name,
                    db_collections: vec![name],
                    is_empty: false,
                }),
            }
        }

        info!("Names retrieved successfully");

        Ok(collections)
    }

    #[instrument(skip(self))]
    pub async fn read_table_catalog(&self, schema_name: &str, table_name: &str) -> Result<TableCatalog> {
        let properties_query = queries::get_table_properties_query(schema_name, table_name);
        let columns_query = queries::get_table_columns_query(schema_name, table_name);
        let primary_key_query = queries::get_table_primary_key_query(schema_name, table_name);
        let unique_query = queries::get_table_unique_constraints_query(schema_name, table_name);
        let foreign_keys_query = queries::get_table_foreign_keys_query(schema_name, table_name);
        let checks_query = queries::get_table_check_constraints_query(schema_name, table_name);
        let indexes_query = queries::get_table_indexes_query(schema_name, table_name);

        let (properties, columns, primary_key, unique_constraints, foreign_keys, check_constraints, indexes): (
            Vec<TablePropertiesRow>,
            _,
            _,
            _,
            _,
            _,
            _,
        ) = try_join!(
            self.session.get_results(&properties_query),
            self.session.get_results(&columns_query),
            self.session.get_results(&primary_key_query),
            self.session.get_results(&unique_query),
            self.session.get_results(&foreign_keys_query),
            self.session.get_results(&checks_query),
            self.session.get_results(&indexes_query),
        )?;

        debug!(columns = columns.len(), "Read table catalog");

        Ok(TableCatalog {
            schema_name: schema_name.to_string(),
            table_name: table_name.to_string(),
            properties: properties.into_iter().next(),
            columns,
            primary_key,
            unique_constraints,
            foreign_keys,
            check_constraints,
            indexes,
        })
    }

    #[instrument(skip(self))]
    pub async fn read_view_catalog(&self, schema_name: &str, view_name: &str) -> Result<ViewCatalog> {
        let rows: Vec<ViewDefinitionRow> = self
            .session
            .get_results(&queries::get_view_definition_query(schema_name, view_name))
            .await?;

        Ok(ViewCatalog {
            schema_name: schema_name.to_string(),
            view_name: view_name.to_string(),
            definition: rows.into_iter().next(),
        })
    }

    /// DDL for a table, or for a view when the name carries the view suffix.
    pub async fn get_table_ddl(&self, schema_name: &str, collection_name: &str) -> Result<String> {
        if is_view_name(collection_name) {
            let view = self.read_view_catalog(schema_name, get_view_name(collection_name)).await?;
            return Ok(view.get_ddl());
        }

        let table = self.read_table_catalog(schema_name, collection_name).await?;
        Ok(table.get_ddl())
    }

    /// Catalog data of the given collections of one schema, read one collection at a time.
    #[instrument(skip(self, collection_names))]
    pub async fn read_snapshot(&self, schema_name: &str, collection_names: &[String]) -> Result<CatalogSnapshot> {
        info!(schema = schema_name, "Parsing schema");

        let mut snapshot = CatalogSnapshot::default();

        for name in collection_names {
            if is_view_name(name) {
                snapshot.views.push(self.read_view_catalog(schema_name, get_view_name(name)).await?);
            } else {
                snapshot.tables.push(self.read_table_catalog(schema_name, name).await?);
            }
        }

        Ok(snapshot)
    }
}
