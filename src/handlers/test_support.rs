use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};

use crate::domain::catalog::{
    Album, AlbumDuration, AlbumFormat, Anc, AudioEquipment, Genre, Headphone, HeadphoneType,
    Product, ProductKind, Rpm, Vinyl, VinylSize,
};
use crate::domain::ports::{
    MockClock, MockOrderRepository, MockProductRepository, MockUserRepository,
    MockWishlistRepository,
};
use crate::domain::user::User;
use crate::state::AppState;

pub struct Ports {
    pub products: MockProductRepository,
    pub users: MockUserRepository,
    pub orders: MockOrderRepository,
    pub wishlists: MockWishlistRepository,
    pub clock: MockClock,
}

impl Default for Ports {
    fn default() -> Self {
        let mut clock = MockClock::new();
        clock.expect_today().returning(today);
        Ports {
            products: MockProductRepository::new(),
            users: MockUserRepository::new(),
            orders: MockOrderRepository::new(),
            wishlists: MockWishlistRepository::new(),
            clock,
        }
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
}

pub fn state_with(ports: Ports) -> AppState {
    AppState::new(
        Arc::new(ports.products),
        Arc::new(ports.users),
        Arc::new(ports.orders),
        Arc::new(ports.wishlists),
        Arc::new(ports.clock),
    )
}

pub fn juan() -> User {
    User {
        id: 1,
        name: "Juan Perez".to_string(),
        phone: "+54 11 5555 0000".to_string(),
        email: "juan@example.com".to_string(),
        password_hash: crate::application::password::hash_password("vinilo123").unwrap(),
        address: "Av. Corrientes 1234".to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    }
}

pub fn album_attributes() -> Album {
    Album {
        artist: "Pescado Rabioso".to_string(),
        year: 1973,
        format: AlbumFormat::Lp,
        genre: Genre::Rock,
        duration: AlbumDuration::from_seconds(40 * 60),
    }
}

pub fn album(id: i64) -> Product {
    Product {
        id,
        name: "Artaud".to_string(),
        price: "25.00".parse().unwrap(),
        stock: 10,
        kind: ProductKind::Album(album_attributes()),
    }
}

pub fn vinyl(id: i64) -> Product {
    Product {
        id,
        name: "Artaud".to_string(),
        price: "40.00".parse().unwrap(),
        stock: 5,
        kind: ProductKind::Vinyl(Vinyl {
            album: album_attributes(),
            size: VinylSize::S12,
            rpm: Rpm::Rpm33,
            color: "black".to_string(),
        }),
    }
}

pub fn headphone(id: i64) -> Product {
    Product {
        id,
        name: "HD 25".to_string(),
        price: "120.00".parse().unwrap(),
        stock: 3,
        kind: ProductKind::Headphone(Headphone {
            equipment: AudioEquipment {
                brand: "Sennheiser".to_string(),
                color: "black".to_string(),
                battery_life: 0,
                warranty: 24,
                microphone_built_in: false,
                wireless: false,
                bluetooth: false,
                usb: false,
                aux: true,
            },
            headphone_type: HeadphoneType::OnEar,
            anc: Anc::Passive,
        }),
    }
}
