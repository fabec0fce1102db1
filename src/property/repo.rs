use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Property listing row. `owner_id` is a nominal relation to users,
/// deliberately unenforced in the schema.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub owner_id: Option<i64>,
}

/// Optional one-to-one feature sheet for a property. The row is removed
/// by cascade when the owning property is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFeature {
    pub id: i64,
    pub property_id: i64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub parking_spots: i32,
    pub area: f64,
    pub has_swimming_pool: bool,
    pub has_garden_yard: bool,
}

#[derive(Debug, Clone)]
pub struct NewPropertyFeature {
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub parking_spots: i32,
    pub area: f64,
    pub has_swimming_pool: bool,
    pub has_garden_yard: bool,
}

#[derive(Debug, Clone)]
pub struct NewProperty {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub owner_id: Option<i64>,
    pub feature: Option<NewPropertyFeature>,
}

/// Partial patch; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct PropertyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub owner_id: Option<i64>,
}

/// Persistence capabilities for property records.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// One page of rows plus the total row count.
    async fn find_page(&self, skip: i64, limit: i64) -> anyhow::Result<(Vec<Property>, i64)>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Property>>;
    async fn find_feature(&self, property_id: i64) -> anyhow::Result<Option<PropertyFeature>>;
    async fn insert(&self, new: NewProperty) -> anyhow::Result<Property>;
    /// Returns false when no row matched the id. Nothing is written then.
    async fn update(&self, id: i64, patch: PropertyPatch) -> anyhow::Result<bool>;
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

pub struct PgPropertyStore {
    db: PgPool,
}

impl PgPropertyStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PropertyStore for PgPropertyStore {
    async fn find_page(&self, skip: i64, limit: i64) -> anyhow::Result<(Vec<Property>, i64)> {
        let rows = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, name, description, price, owner_id
            FROM properties
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM properties")
            .fetch_one(&self.db)
            .await?;

        Ok((rows, total))
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Property>> {
        let row = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, name, description, price, owner_id
            FROM properties
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_feature(&self, property_id: i64) -> anyhow::Result<Option<PropertyFeature>> {
        let row = sqlx::query_as::<_, PropertyFeature>(
            r#"
            SELECT id, property_id, bedrooms, bathrooms, parking_spots, area,
                   has_swimming_pool, has_garden_yard
            FROM property_features
            WHERE property_id = $1
            "#,
        )
        .bind(property_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert(&self, new: NewProperty) -> anyhow::Result<Property> {
        let mut tx = self.db.begin().await?;

        let property = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (name, description, price, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, owner_id
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(f) = &new.feature {
            sqlx::query(
                r#"
                INSERT INTO property_features
                    (property_id, bedrooms, bathrooms, parking_spots, area,
                     has_swimming_pool, has_garden_yard)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(property.id)
            .bind(f.bedrooms)
            .bind(f.bathrooms)
            .bind(f.parking_spots)
            .bind(f.area)
            .bind(f.has_swimming_pool)
            .bind(f.has_garden_yard)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(property)
    }

    async fn update(&self, id: i64, patch: PropertyPatch) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE properties
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                owner_id = COALESCE($5, owner_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.price)
        .bind(patch.owner_id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        // property_features row goes with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
