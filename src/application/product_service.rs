use std::sync::Arc;

use chrono::Datelike;

use crate::domain::catalog::{check_price_range, round_price, Category, NewProduct, Product};
use crate::domain::errors::DomainError;
use crate::domain::ports::{Clock, ProductRepository};
use crate::domain::product_patch::ProductPatch;
use crate::domain::product_query::ProductQuery;

#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
    clock: Arc<dyn Clock>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    fn current_year(&self) -> i32 {
        self.clock.today().year()
    }

    pub fn create_product(&self, mut product: NewProduct) -> Result<Product, DomainError> {
        product.price = round_price(&product.price)?;
        product.validate(self.current_year())?;

        let created = self.repo.create(product)?;
        log::info!(
            "Created {} {} ({})",
            created.category().label(),
            created.id,
            created.name
        );
        Ok(created)
    }

    pub fn get_product(&self, id: i64) -> Result<Product, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found("Product", id))
    }

    /// Looks a product up by id, treating a product of another kind as
    /// missing.
    pub fn get_product_of(&self, category: Category, id: i64) -> Result<Product, DomainError> {
        self.repo
            .find_by_id(id)?
            .filter(|product| product.category() == category)
            .ok_or_else(|| DomainError::not_found(category.label(), id))
    }

    pub fn find_products(&self, query: &ProductQuery) -> Result<Vec<Product>, DomainError> {
        validate_query(query)?;
        self.repo.find(query)
    }

    pub fn count_products(&self, query: &ProductQuery) -> Result<i64, DomainError> {
        validate_query(query)?;
        self.repo.count(query)
    }

    /// Applies `patch` to the stored product of the patch's kind, re-validates
    /// and writes it back.
    pub fn update_product(&self, id: i64, patch: ProductPatch) -> Result<Product, DomainError> {
        let mut product = self.get_product_of(patch.category(), id)?;
        if !patch.apply(&mut product) {
            return Err(DomainError::not_found(product.category().label(), id));
        }
        product.price = round_price(&product.price)?;
        product.validate(self.current_year())?;

        let updated = self.repo.update(&product)?;
        log::info!("Updated {} {}", updated.category().label(), updated.id);
        Ok(updated)
    }

    pub fn delete_product(&self, id: i64) -> Result<(), DomainError> {
        let product = self.get_product(id)?;
        self.guarded_delete(&product)
    }

    pub fn delete_product_of(&self, category: Category, id: i64) -> Result<(), DomainError> {
        let product = self.get_product_of(category, id)?;
        self.guarded_delete(&product)
    }

    fn guarded_delete(&self, product: &Product) -> Result<(), DomainError> {
        let label = product.category().label();
        if self.repo.is_ordered(product.id)? {
            log::warn!("Refusing to delete {} {}: ordered", label, product.id);
            return Err(DomainError::Conflict(format!(
                "{} with id {} cannot be deleted because it is associated with an order",
                label, product.id
            )));
        }
        if self.repo.is_wishlisted(product.id)? {
            log::warn!("Refusing to delete {} {}: wishlisted", label, product.id);
            return Err(DomainError::Conflict(format!(
                "{} with id {} cannot be deleted because it is in a wishlist",
                label, product.id
            )));
        }
        if !self.repo.delete(product.id)? {
            return Err(DomainError::not_found(label, product.id));
        }
        log::info!("Deleted {} {}", label, product.id);
        Ok(())
    }
}

fn validate_query(query: &ProductQuery) -> Result<(), DomainError> {
    fn ordered<T: PartialOrd>(
        min: &Option<T>,
        max: &Option<T>,
        what: &str,
    ) -> Result<(), DomainError> {
        match (min, max) {
            (Some(min), Some(max)) if min > max => Err(DomainError::validation(format!(
                "{} range start must not be after its end",
                what
            ))),
            _ => Ok(()),
        }
    }

    if let Some(min) = &query.min_price {
        check_price_range("min_price", min)?;
    }
    if let Some(max) = &query.max_price {
        check_price_range("max_price", max)?;
    }
    ordered(&query.min_price, &query.max_price, "price")?;
    ordered(&query.min_year, &query.max_year, "year")?;
    ordered(&query.min_duration, &query.max_duration, "duration")?;
    ordered(&query.min_power, &query.max_power, "power")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::catalog::{
        Album, AlbumFormat, Anc, AudioEquipment, Genre, Headphone, HeadphoneType, ProductKind, Rpm,
        Vinyl, VinylSize,
    };
    use crate::domain::ports::{MockClock, MockProductRepository};
    use crate::domain::product_patch::{AlbumPatch, KindPatch};

    fn clock() -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock
            .expect_today()
            .returning(|| NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        Arc::new(clock)
    }

    fn service(repo: MockProductRepository) -> ProductService {
        ProductService::new(Arc::new(repo), clock())
    }

    fn album(year: i32) -> Album {
        Album {
            artist: "Charly García".to_string(),
            year,
            format: AlbumFormat::Lp,
            genre: Genre::Rock,
            duration: "37:45".parse().unwrap(),
        }
    }

    fn new_vinyl(year: i32, rpm: Rpm) -> NewProduct {
        NewProduct {
            name: "Clics Modernos".to_string(),
            price: "30.00".parse().unwrap(),
            stock: 4,
            kind: ProductKind::Vinyl(Vinyl {
                album: album(year),
                size: VinylSize::S12,
                rpm,
                color: "black".to_string(),
            }),
        }
    }

    fn stored(id: i64, new: NewProduct) -> Product {
        Product {
            id,
            name: new.name,
            price: new.price,
            stock: new.stock,
            kind: new.kind,
        }
    }

    fn stored_album(id: i64) -> Product {
        Product {
            id,
            name: "Piano Bar".to_string(),
            price: "25.00".parse().unwrap(),
            stock: 3,
            kind: ProductKind::Album(album(1984)),
        }
    }

    fn stored_headphone(id: i64) -> Product {
        Product {
            id,
            name: "HD 600".to_string(),
            price: "299.00".parse().unwrap(),
            stock: 1,
            kind: ProductKind::Headphone(Headphone {
                equipment: AudioEquipment {
                    brand: "Sennheiser".to_string(),
                    color: "grey".to_string(),
                    battery_life: 0,
                    warranty: 24,
                    microphone_built_in: false,
                    wireless: false,
                    bluetooth: false,
                    usb: false,
                    aux: true,
                },
                headphone_type: HeadphoneType::OverEar,
                anc: Anc::Off,
            }),
        }
    }

    #[test]
    fn vinyl_before_1860_is_rejected() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let err = service(repo)
            .create_product(new_vinyl(1850, Rpm::Rpm33))
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn vinyl_within_range_is_saved() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|product| Ok(stored(1, product)));

        let created = service(repo)
            .create_product(new_vinyl(2024, Rpm::Rpm45))
            .unwrap();

        assert_eq!(created.category(), Category::Vinyl);
    }

    #[test]
    fn year_boundaries_are_accepted() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .times(2)
            .returning(|product| Ok(stored(1, product)));
        let service = service(repo);

        assert!(service.create_product(new_vinyl(1860, Rpm::Rpm33)).is_ok());
        assert!(service.create_product(new_vinyl(2026, Rpm::Rpm33)).is_ok());
        assert!(service.create_product(new_vinyl(2027, Rpm::Rpm33)).is_err());
    }

    #[test]
    fn vinyl_with_combined_rpm_is_rejected() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let err = service(repo)
            .create_product(new_vinyl(1983, Rpm::Rpm33Or45))
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("RPM_33_45")));
    }

    #[test]
    fn price_is_rounded_to_cents_before_saving() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .withf(|product| product.price.to_string() == "10.13")
            .returning(|product| Ok(stored(2, product)));
        let mut product = new_vinyl(1983, Rpm::Rpm33);
        product.price = "10.125".parse().unwrap();

        assert!(service(repo).create_product(product).is_ok());
    }

    #[test]
    fn name_only_update_keeps_the_rest() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .with(eq(5))
            .returning(|id| Ok(Some(stored_album(id))));
        repo.expect_update().returning(|product| Ok(product.clone()));

        let patch = ProductPatch {
            name: Some("Piano Bar (2024 Remaster)".to_string()),
            price: None,
            stock: None,
            kind: KindPatch::Album(AlbumPatch::default()),
        };
        let updated = service(repo).update_product(5, patch).unwrap();

        let original = stored_album(5);
        assert_eq!(updated.name, "Piano Bar (2024 Remaster)");
        assert_eq!(updated.price, original.price);
        assert_eq!(updated.stock, original.stock);
        assert_eq!(updated.kind, original.kind);
    }

    #[test]
    fn update_revalidates_year() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored_album(id))));
        repo.expect_update().never();

        let patch = ProductPatch {
            name: None,
            price: None,
            stock: None,
            kind: KindPatch::Album(AlbumPatch {
                year: Some(1700),
                ..Default::default()
            }),
        };

        assert!(matches!(
            service(repo).update_product(5, patch),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn album_update_on_headphone_id_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored_headphone(id))));
        repo.expect_update().never();

        let patch = ProductPatch {
            name: Some("x".to_string()),
            price: None,
            stock: None,
            kind: KindPatch::Album(AlbumPatch::default()),
        };

        assert!(matches!(
            service(repo).update_product(9, patch),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn deleting_wishlisted_headphone_is_blocked() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored_headphone(id))));
        repo.expect_is_ordered().returning(|_| Ok(false));
        repo.expect_is_wishlisted().returning(|_| Ok(true));
        repo.expect_delete().never();

        let err = service(repo)
            .delete_product_of(Category::Headphone, 3)
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(msg) if msg.contains("wishlist")));
    }

    #[test]
    fn deleting_ordered_album_is_blocked() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored_album(id))));
        repo.expect_is_ordered().with(eq(4)).returning(|_| Ok(true));
        repo.expect_is_wishlisted().never();
        repo.expect_delete().never();

        let err = service(repo).delete_product(4).unwrap_err();

        assert!(matches!(err, DomainError::Conflict(msg) if msg.contains("order")));
    }

    #[test]
    fn unreferenced_product_is_deleted() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored_album(id))));
        repo.expect_is_ordered().returning(|_| Ok(false));
        repo.expect_is_wishlisted().returning(|_| Ok(false));
        repo.expect_delete().with(eq(4)).times(1).returning(|_| Ok(true));

        assert!(service(repo).delete_product_of(Category::Album, 4).is_ok());
    }

    #[test]
    fn deleting_missing_product_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        assert!(matches!(
            service(repo).delete_product(99),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        let mut repo = MockProductRepository::new();
        repo.expect_find().never();
        let query = ProductQuery {
            min_year: Some(2000),
            max_year: Some(1990),
            ..ProductQuery::for_category(Category::Album)
        };

        assert!(matches!(
            service(repo).find_products(&query),
            Err(DomainError::Validation(_))
        ));
    }
}
