use tracing::info;

use crate::error::ApiError;
use crate::property::dto::{
    CreatePropertyRequest, PropertyDetails, Pagination, UpdatePropertyRequest,
};
use crate::property::repo::{
    NewProperty, NewPropertyFeature, Property, PropertyPatch, PropertyStore,
};

const MAX_LIMIT: i64 = 100;

/// One page of properties with offset-pagination metadata.
#[derive(Debug)]
pub struct PropertyPage {
    pub items: Vec<Property>,
    pub total: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Property with ID {id} not found"))
}

pub async fn find_all(
    store: &dyn PropertyStore,
    pagination: &Pagination,
) -> Result<PropertyPage, ApiError> {
    let skip = pagination.skip.max(0);
    let limit = pagination.limit.clamp(1, MAX_LIMIT);

    let (items, total) = store.find_page(skip, limit).await?;
    Ok(PropertyPage {
        items,
        total,
        has_next_page: skip + limit < total,
        has_previous_page: skip > 0,
    })
}

pub async fn find_one(store: &dyn PropertyStore, id: i64) -> Result<PropertyDetails, ApiError> {
    let property = store.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    let feature = store.find_feature(id).await?;
    Ok(PropertyDetails { property, feature })
}

pub async fn create(
    store: &dyn PropertyStore,
    req: CreatePropertyRequest,
) -> Result<PropertyDetails, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("Property name must not be empty".into()));
    }
    if req.price < 0.0 {
        return Err(ApiError::Validation("Price must not be negative".into()));
    }

    let property = store
        .insert(NewProperty {
            name: req.name,
            description: req.description,
            price: req.price,
            owner_id: req.owner_id,
            feature: req.feature.map(|f| NewPropertyFeature {
                bedrooms: f.bedrooms,
                bathrooms: f.bathrooms,
                parking_spots: f.parking_spots,
                area: f.area,
                has_swimming_pool: f.has_swimming_pool,
                has_garden_yard: f.has_garden_yard,
            }),
        })
        .await?;

    info!(property_id = %property.id, "property created");
    let feature = store.find_feature(property.id).await?;
    Ok(PropertyDetails { property, feature })
}

/// Applies the patch, then re-reads the row so the response reflects
/// exactly what was persisted.
pub async fn update(
    store: &dyn PropertyStore,
    id: i64,
    req: UpdatePropertyRequest,
) -> Result<PropertyDetails, ApiError> {
    if let Some(price) = req.price {
        if price < 0.0 {
            return Err(ApiError::Validation("Price must not be negative".into()));
        }
    }

    let matched = store
        .update(
            id,
            PropertyPatch {
                name: req.name,
                description: req.description,
                price: req.price,
                owner_id: req.owner_id,
            },
        )
        .await?;
    if !matched {
        return Err(not_found(id));
    }

    info!(property_id = %id, "property updated");
    find_one(store, id).await
}

pub async fn delete(store: &dyn PropertyStore, id: i64) -> Result<(), ApiError> {
    if !store.delete(id).await? {
        return Err(not_found(id));
    }
    info!(property_id = %id, "property deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::repo::PropertyFeature;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;

    struct MemPropertyStore {
        properties: Mutex<Vec<Property>>,
        features: Mutex<Vec<PropertyFeature>>,
        next_id: AtomicI64,
    }

    impl MemPropertyStore {
        fn new() -> Self {
            Self {
                properties: Mutex::new(Vec::new()),
                features: Mutex::new(Vec::new()),
                next_id: AtomicI64::new(1),
            }
        }

        async fn seed(&self, count: usize) {
            for i in 0..count {
                self.insert(NewProperty {
                    name: format!("Property {i}"),
                    description: "desc".into(),
                    price: 1000.0 + i as f64,
                    owner_id: None,
                    feature: None,
                })
                .await
                .unwrap();
            }
        }
    }

    #[async_trait]
    impl PropertyStore for MemPropertyStore {
        async fn find_page(
            &self,
            skip: i64,
            limit: i64,
        ) -> anyhow::Result<(Vec<Property>, i64)> {
            let properties = self.properties.lock().unwrap();
            let total = properties.len() as i64;
            let items = properties
                .iter()
                .skip(skip as usize)
                .take(limit as usize)
                .cloned()
                .collect();
            Ok((items, total))
        }

        async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Property>> {
            Ok(self
                .properties
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned())
        }

        async fn find_feature(
            &self,
            property_id: i64,
        ) -> anyhow::Result<Option<PropertyFeature>> {
            Ok(self
                .features
                .lock()
                .unwrap()
                .iter()
                .find(|f| f.property_id == property_id)
                .cloned())
        }

        async fn insert(&self, new: NewProperty) -> anyhow::Result<Property> {
            let property = Property {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                name: new.name,
                description: new.description,
                price: new.price,
                owner_id: new.owner_id,
            };
            if let Some(f) = new.feature {
                self.features.lock().unwrap().push(PropertyFeature {
                    id: property.id,
                    property_id: property.id,
                    bedrooms: f.bedrooms,
                    bathrooms: f.bathrooms,
                    parking_spots: f.parking_spots,
                    area: f.area,
                    has_swimming_pool: f.has_swimming_pool,
                    has_garden_yard: f.has_garden_yard,
                });
            }
            self.properties.lock().unwrap().push(property.clone());
            Ok(property)
        }

        async fn update(&self, id: i64, patch: PropertyPatch) -> anyhow::Result<bool> {
            let mut properties = self.properties.lock().unwrap();
            match properties.iter_mut().find(|p| p.id == id) {
                Some(p) => {
                    if let Some(name) = patch.name {
                        p.name = name;
                    }
                    if let Some(description) = patch.description {
                        p.description = description;
                    }
                    if let Some(price) = patch.price {
                        p.price = price;
                    }
                    if let Some(owner_id) = patch.owner_id {
                        p.owner_id = Some(owner_id);
                    }
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, id: i64) -> anyhow::Result<bool> {
            let mut properties = self.properties.lock().unwrap();
            let before = properties.len();
            properties.retain(|p| p.id != id);
            let deleted = properties.len() < before;
            if deleted {
                self.features.lock().unwrap().retain(|f| f.property_id != id);
            }
            Ok(deleted)
        }
    }

    #[tokio::test]
    async fn last_page_flags() {
        let store = MemPropertyStore::new();
        store.seed(25).await;

        let page = find_all(&store, &Pagination { skip: 20, limit: 10 })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total, 25);
        assert!(!page.has_next_page);
        assert!(page.has_previous_page);
    }

    #[tokio::test]
    async fn first_page_flags() {
        let store = MemPropertyStore::new();
        store.seed(25).await;

        let page = find_all(&store, &Pagination { skip: 0, limit: 10 })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 10);
        assert!(page.has_next_page);
        assert!(!page.has_previous_page);
    }

    #[tokio::test]
    async fn exact_boundary_has_no_next_page() {
        let store = MemPropertyStore::new();
        store.seed(20).await;

        let page = find_all(&store, &Pagination { skip: 10, limit: 10 })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 10);
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn negative_skip_and_oversized_limit_are_clamped() {
        let store = MemPropertyStore::new();
        store.seed(5).await;

        let page = find_all(&store, &Pagination { skip: -3, limit: 5000 })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 5);
        assert!(!page.has_previous_page);
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found_and_writes_nothing() {
        let store = MemPropertyStore::new();
        store.seed(1).await;

        let err = update(
            &store,
            999,
            UpdatePropertyRequest {
                name: Some("changed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(store.properties.lock().unwrap()[0].name, "Property 0");
    }

    #[tokio::test]
    async fn update_patches_only_provided_fields_and_rereads() {
        let store = MemPropertyStore::new();
        store.seed(1).await;

        let details = update(
            &store,
            1,
            UpdatePropertyRequest {
                price: Some(99.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(details.property.price, 99.0);
        assert_eq!(details.property.name, "Property 0");
    }

    #[tokio::test]
    async fn delete_missing_id_is_not_found() {
        let store = MemPropertyStore::new();
        let err = delete(&store, 42).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_feature_with_property() {
        let store = MemPropertyStore::new();
        let details = create(
            &store,
            CreatePropertyRequest {
                name: "Villa".into(),
                description: "Seaside".into(),
                price: 250000.0,
                owner_id: None,
                feature: Some(crate::property::dto::CreateFeatureRequest {
                    bedrooms: 3,
                    bathrooms: 2,
                    parking_spots: 1,
                    area: 120.0,
                    has_swimming_pool: true,
                    has_garden_yard: true,
                }),
            },
        )
        .await
        .unwrap();
        assert!(details.feature.is_some());

        delete(&store, details.property.id).await.unwrap();
        assert!(store.features.lock().unwrap().is_empty());
        assert!(matches!(
            find_one(&store, details.property.id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn create_rejects_invalid_input() {
        let store = MemPropertyStore::new();
        let blank = create(
            &store,
            CreatePropertyRequest {
                name: "  ".into(),
                description: "d".into(),
                price: 1.0,
                owner_id: None,
                feature: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(blank, ApiError::Validation(_)));

        let negative = create(
            &store,
            CreatePropertyRequest {
                name: "House".into(),
                description: "d".into(),
                price: -1.0,
                owner_id: None,
                feature: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(negative, ApiError::Validation(_)));
    }
}
