use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::catalog::{
    Album, AlbumDuration, AudioEquipment, Headphone, Player, Portable, Speaker, Turntable, Vinyl,
};
use crate::domain::errors::DomainError;
use crate::domain::user::User;
use crate::schema::{
    albums, audio_equipment, headphones, order_products, orders, players, portables, products,
    speakers, turntables, users, vinyls, wishlist_products, wishlists,
};

/// Parses a discriminator column; an unknown value means the row was written
/// by something other than this service.
pub(crate) fn column<T>(value: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr<Err = DomainError>,
{
    value
        .parse()
        .map_err(|e: DomainError| DomainError::Internal(format!("corrupt column value: {}", e)))
}

/// Seconds as stored in `albums.duration_seconds`.
pub(crate) fn duration_column(duration: AlbumDuration) -> Result<i32, DomainError> {
    i32::try_from(duration.seconds())
        .map_err(|_| DomainError::validation(format!("duration {} is too long", duration)))
}

// ── Products ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price: BigDecimal,
    pub stock: i32,
    pub category: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub name: String,
    pub price: BigDecimal,
    pub stock: i32,
    pub category: String,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = products)]
pub struct ProductChangeset {
    pub name: String,
    pub price: BigDecimal,
    pub stock: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset, Identifiable)]
#[diesel(table_name = albums, primary_key(product_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AlbumRow {
    pub product_id: i64,
    pub artist: String,
    pub year: i32,
    pub format: String,
    pub genre: String,
    pub duration_seconds: i32,
}

impl AlbumRow {
    pub fn from_domain(product_id: i64, album: &Album) -> Result<Self, DomainError> {
        Ok(AlbumRow {
            product_id,
            artist: album.artist.clone(),
            year: album.year,
            format: album.format.as_str().to_string(),
            genre: album.genre.as_str().to_string(),
            duration_seconds: duration_column(album.duration)?,
        })
    }

    pub fn into_domain(self) -> Result<Album, DomainError> {
        Ok(Album {
            artist: self.artist,
            year: self.year,
            format: column(&self.format)?,
            genre: column(&self.genre)?,
            duration: AlbumDuration::from_seconds(self.duration_seconds.max(0) as u32),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset, Identifiable)]
#[diesel(table_name = vinyls, primary_key(product_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VinylRow {
    pub product_id: i64,
    pub size: String,
    pub rpm: String,
    pub color: String,
}

impl VinylRow {
    pub fn from_domain(product_id: i64, vinyl: &Vinyl) -> Self {
        VinylRow {
            product_id,
            size: vinyl.size.as_str().to_string(),
            rpm: vinyl.rpm.as_str().to_string(),
            color: vinyl.color.clone(),
        }
    }

    pub fn into_domain(self, album: Album) -> Result<Vinyl, DomainError> {
        Ok(Vinyl {
            album,
            size: column(&self.size)?,
            rpm: column(&self.rpm)?,
            color: self.color,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset, Identifiable)]
#[diesel(table_name = audio_equipment, primary_key(product_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AudioEquipmentRow {
    pub product_id: i64,
    pub brand: String,
    pub color: String,
    pub battery_life: i32,
    pub warranty: i32,
    pub microphone_built_in: bool,
    pub wireless: bool,
    pub bluetooth: bool,
    pub usb: bool,
    pub aux: bool,
}

impl AudioEquipmentRow {
    pub fn from_domain(product_id: i64, equipment: &AudioEquipment) -> Self {
        AudioEquipmentRow {
            product_id,
            brand: equipment.brand.clone(),
            color: equipment.color.clone(),
            battery_life: equipment.battery_life,
            warranty: equipment.warranty,
            microphone_built_in: equipment.microphone_built_in,
            wireless: equipment.wireless,
            bluetooth: equipment.bluetooth,
            usb: equipment.usb,
            aux: equipment.aux,
        }
    }

    pub fn into_domain(self) -> AudioEquipment {
        AudioEquipment {
            brand: self.brand,
            color: self.color,
            battery_life: self.battery_life,
            warranty: self.warranty,
            microphone_built_in: self.microphone_built_in,
            wireless: self.wireless,
            bluetooth: self.bluetooth,
            usb: self.usb,
            aux: self.aux,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset, Identifiable)]
#[diesel(table_name = headphones, primary_key(product_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HeadphoneRow {
    pub product_id: i64,
    pub headphone_type: String,
    pub anc: String,
}

impl HeadphoneRow {
    pub fn from_domain(product_id: i64, headphone: &Headphone) -> Self {
        HeadphoneRow {
            product_id,
            headphone_type: headphone.headphone_type.as_str().to_string(),
            anc: headphone.anc.as_str().to_string(),
        }
    }

    pub fn into_domain(self, equipment: AudioEquipment) -> Result<Headphone, DomainError> {
        Ok(Headphone {
            equipment,
            headphone_type: column(&self.headphone_type)?,
            anc: column(&self.anc)?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset, Identifiable)]
#[diesel(table_name = speakers, primary_key(product_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SpeakerRow {
    pub product_id: i64,
    pub radio: bool,
    pub power: i32,
    pub impedance: i32,
    pub min_frequency: i32,
    pub max_frequency: i32,
    pub weight: i32,
    pub power_type: String,
    pub resistance: String,
}

impl SpeakerRow {
    pub fn from_domain(product_id: i64, speaker: &Speaker) -> Self {
        SpeakerRow {
            product_id,
            radio: speaker.radio,
            power: speaker.power,
            impedance: speaker.impedance,
            min_frequency: speaker.min_frequency,
            max_frequency: speaker.max_frequency,
            weight: speaker.weight,
            power_type: speaker.power_type.as_str().to_string(),
            resistance: speaker.resistance.as_str().to_string(),
        }
    }

    pub fn into_domain(self, equipment: AudioEquipment) -> Result<Speaker, DomainError> {
        Ok(Speaker {
            equipment,
            radio: self.radio,
            power: self.power,
            impedance: self.impedance,
            min_frequency: self.min_frequency,
            max_frequency: self.max_frequency,
            weight: self.weight,
            power_type: column(&self.power_type)?,
            resistance: column(&self.resistance)?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset, Identifiable)]
#[diesel(table_name = players, primary_key(product_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PlayerRow {
    pub product_id: i64,
    pub brand: String,
    pub color: String,
    pub warranty: i32,
    pub bluetooth: bool,
    pub usb: bool,
    pub radio: bool,
    pub aux: bool,
    pub rca: bool,
    pub built_in_speaker: bool,
}

impl PlayerRow {
    pub fn from_domain(product_id: i64, player: &Player) -> Self {
        PlayerRow {
            product_id,
            brand: player.brand.clone(),
            color: player.color.clone(),
            warranty: player.warranty,
            bluetooth: player.bluetooth,
            usb: player.usb,
            radio: player.radio,
            aux: player.aux,
            rca: player.rca,
            built_in_speaker: player.built_in_speaker,
        }
    }

    pub fn into_domain(self) -> Player {
        Player {
            brand: self.brand,
            color: self.color,
            warranty: self.warranty,
            bluetooth: self.bluetooth,
            usb: self.usb,
            radio: self.radio,
            aux: self.aux,
            rca: self.rca,
            built_in_speaker: self.built_in_speaker,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset, Identifiable)]
#[diesel(table_name = turntables, primary_key(product_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TurntableRow {
    pub product_id: i64,
    pub has_built_in_pre_amp: bool,
    pub rpm: String,
    pub traction: String,
    pub mechanism: String,
}

impl TurntableRow {
    pub fn from_domain(product_id: i64, turntable: &Turntable) -> Self {
        TurntableRow {
            product_id,
            has_built_in_pre_amp: turntable.has_built_in_pre_amp,
            rpm: turntable.rpm.as_str().to_string(),
            traction: turntable.traction.as_str().to_string(),
            mechanism: turntable.mechanism.as_str().to_string(),
        }
    }

    pub fn into_domain(self, player: Player) -> Result<Turntable, DomainError> {
        Ok(Turntable {
            player,
            has_built_in_pre_amp: self.has_built_in_pre_amp,
            rpm: column(&self.rpm)?,
            traction: column(&self.traction)?,
            mechanism: column(&self.mechanism)?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset, Identifiable)]
#[diesel(table_name = portables, primary_key(product_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PortableRow {
    pub product_id: i64,
    pub portable_type: String,
    pub power_type: String,
    pub battery_life: i32,
    pub resistance: String,
}

impl PortableRow {
    pub fn from_domain(product_id: i64, portable: &Portable) -> Self {
        PortableRow {
            product_id,
            portable_type: portable.portable_type.as_str().to_string(),
            power_type: portable.power_type.as_str().to_string(),
            battery_life: portable.battery_life,
            resistance: portable.resistance.as_str().to_string(),
        }
    }

    pub fn into_domain(self, player: Player) -> Result<Portable, DomainError> {
        Ok(Portable {
            player,
            portable_type: column(&self.portable_type)?,
            power_type: column(&self.power_type)?,
            battery_life: self.battery_life,
            resistance: column(&self.resistance)?,
        })
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            password_hash: row.password_hash,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserFields<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub address: &'a str,
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i64,
    pub tracking_number: String,
    pub user_id: i64,
    pub status: String,
    pub total_amount: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub tracking_number: String,
    pub user_id: i64,
    pub status: String,
    pub total_amount: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_products)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderProductRow {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_products)]
pub struct NewOrderProductRow {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}

// ── Wishlists ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = wishlists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WishlistRow {
    pub id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = wishlist_products)]
#[diesel(belongs_to(WishlistRow, foreign_key = wishlist_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WishlistProductRow {
    pub id: i64,
    pub wishlist_id: i64,
    pub product_id: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = wishlist_products)]
pub struct NewWishlistProductRow {
    pub wishlist_id: i64,
    pub product_id: i64,
}
