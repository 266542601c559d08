//! Partial updates for products.
//!
//! A `None` field means "leave unchanged"; any `Some` value, including zero or
//! `false`, is written.

use bigdecimal::BigDecimal;
use serde::Deserialize;
use utoipa::ToSchema;

use super::catalog::{
    AlbumDuration, AlbumFormat, Anc, Category, Genre, HeadphoneType, Mechanism, PortableType,
    PowerType, Product, ProductKind, Resistance, Rpm, Traction, VinylSize,
};

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct AlbumPatch {
    pub artist: Option<String>,
    pub year: Option<i32>,
    pub format: Option<AlbumFormat>,
    pub genre: Option<Genre>,
    #[schema(value_type = Option<String>, example = "42:10")]
    pub duration: Option<AlbumDuration>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct VinylPatch {
    pub size: Option<VinylSize>,
    pub rpm: Option<Rpm>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct AudioEquipmentPatch {
    pub brand: Option<String>,
    pub color: Option<String>,
    pub battery_life: Option<i32>,
    pub warranty: Option<i32>,
    pub microphone_built_in: Option<bool>,
    pub wireless: Option<bool>,
    pub bluetooth: Option<bool>,
    pub usb: Option<bool>,
    pub aux: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct HeadphonePatch {
    pub headphone_type: Option<HeadphoneType>,
    pub anc: Option<Anc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct SpeakerPatch {
    pub radio: Option<bool>,
    pub power: Option<i32>,
    pub impedance: Option<i32>,
    pub min_frequency: Option<i32>,
    pub max_frequency: Option<i32>,
    pub weight: Option<i32>,
    pub power_type: Option<PowerType>,
    pub resistance: Option<Resistance>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct PlayerPatch {
    pub brand: Option<String>,
    pub color: Option<String>,
    pub warranty: Option<i32>,
    pub bluetooth: Option<bool>,
    pub usb: Option<bool>,
    pub radio: Option<bool>,
    pub aux: Option<bool>,
    pub rca: Option<bool>,
    pub built_in_speaker: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct TurntablePatch {
    pub has_built_in_pre_amp: Option<bool>,
    pub rpm: Option<Rpm>,
    pub traction: Option<Traction>,
    pub mechanism: Option<Mechanism>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct PortablePatch {
    pub portable_type: Option<PortableType>,
    pub power_type: Option<PowerType>,
    pub battery_life: Option<i32>,
    pub resistance: Option<Resistance>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KindPatch {
    Album(AlbumPatch),
    Vinyl(AlbumPatch, VinylPatch),
    Headphone(AudioEquipmentPatch, HeadphonePatch),
    Speaker(AudioEquipmentPatch, SpeakerPatch),
    Player(PlayerPatch),
    Turntable(PlayerPatch, TurntablePatch),
    Portable(PlayerPatch, PortablePatch),
}

impl KindPatch {
    pub fn category(&self) -> Category {
        match self {
            KindPatch::Album(_) => Category::Album,
            KindPatch::Vinyl(..) => Category::Vinyl,
            KindPatch::Headphone(..) => Category::Headphone,
            KindPatch::Speaker(..) => Category::Speaker,
            KindPatch::Player(_) => Category::Player,
            KindPatch::Turntable(..) => Category::Turntable,
            KindPatch::Portable(..) => Category::Portable,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<BigDecimal>,
    pub stock: Option<i32>,
    pub kind: KindPatch,
}

impl ProductPatch {
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Applies the provided fields to `product`.
    ///
    /// Returns `false` without touching anything when the patch targets a
    /// different kind than the product.
    pub fn apply(self, product: &mut Product) -> bool {
        if self.category() != product.category() {
            return false;
        }
        set(&mut product.name, self.name);
        set(&mut product.price, self.price);
        set(&mut product.stock, self.stock);

        match (self.kind, &mut product.kind) {
            (KindPatch::Album(patch), ProductKind::Album(album)) => patch.apply(album),
            (KindPatch::Vinyl(album_patch, patch), ProductKind::Vinyl(vinyl)) => {
                album_patch.apply(&mut vinyl.album);
                set(&mut vinyl.size, patch.size);
                set(&mut vinyl.rpm, patch.rpm);
                set(&mut vinyl.color, patch.color);
            }
            (KindPatch::Headphone(equipment, patch), ProductKind::Headphone(headphone)) => {
                equipment.apply(&mut headphone.equipment);
                set(&mut headphone.headphone_type, patch.headphone_type);
                set(&mut headphone.anc, patch.anc);
            }
            (KindPatch::Speaker(equipment, patch), ProductKind::Speaker(speaker)) => {
                equipment.apply(&mut speaker.equipment);
                set(&mut speaker.radio, patch.radio);
                set(&mut speaker.power, patch.power);
                set(&mut speaker.impedance, patch.impedance);
                set(&mut speaker.min_frequency, patch.min_frequency);
                set(&mut speaker.max_frequency, patch.max_frequency);
                set(&mut speaker.weight, patch.weight);
                set(&mut speaker.power_type, patch.power_type);
                set(&mut speaker.resistance, patch.resistance);
            }
            (KindPatch::Player(patch), ProductKind::Player(player)) => patch.apply(player),
            (KindPatch::Turntable(player_patch, patch), ProductKind::Turntable(turntable)) => {
                player_patch.apply(&mut turntable.player);
                set(&mut turntable.has_built_in_pre_amp, patch.has_built_in_pre_amp);
                set(&mut turntable.rpm, patch.rpm);
                set(&mut turntable.traction, patch.traction);
                set(&mut turntable.mechanism, patch.mechanism);
            }
            (KindPatch::Portable(player_patch, patch), ProductKind::Portable(portable)) => {
                player_patch.apply(&mut portable.player);
                set(&mut portable.portable_type, patch.portable_type);
                set(&mut portable.power_type, patch.power_type);
                set(&mut portable.battery_life, patch.battery_life);
                set(&mut portable.resistance, patch.resistance);
            }
            // Categories were compared above.
            _ => return false,
        }
        true
    }
}

impl AlbumPatch {
    fn apply(self, album: &mut super::catalog::Album) {
        set(&mut album.artist, self.artist);
        set(&mut album.year, self.year);
        set(&mut album.format, self.format);
        set(&mut album.genre, self.genre);
        set(&mut album.duration, self.duration);
    }
}

impl AudioEquipmentPatch {
    fn apply(self, equipment: &mut super::catalog::AudioEquipment) {
        set(&mut equipment.brand, self.brand);
        set(&mut equipment.color, self.color);
        set(&mut equipment.battery_life, self.battery_life);
        set(&mut equipment.warranty, self.warranty);
        set(&mut equipment.microphone_built_in, self.microphone_built_in);
        set(&mut equipment.wireless, self.wireless);
        set(&mut equipment.bluetooth, self.bluetooth);
        set(&mut equipment.usb, self.usb);
        set(&mut equipment.aux, self.aux);
    }
}

impl PlayerPatch {
    fn apply(self, player: &mut super::catalog::Player) {
        set(&mut player.brand, self.brand);
        set(&mut player.color, self.color);
        set(&mut player.warranty, self.warranty);
        set(&mut player.bluetooth, self.bluetooth);
        set(&mut player.usb, self.usb);
        set(&mut player.radio, self.radio);
        set(&mut player.aux, self.aux);
        set(&mut player.rca, self.rca);
        set(&mut player.built_in_speaker, self.built_in_speaker);
    }
}
