//! Product taxonomy.
//!
//! Every product shares a base record (name, price, stock) and carries exactly
//! one [`ProductKind`]. The category is always derived from the kind, so a
//! vinyl can never be stored under the album category and vice versa.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

use super::errors::{check_length, DomainError};
use super::string_enum::string_enum;

/// Earliest release year accepted for recorded music.
pub const MIN_RELEASE_YEAR: i32 = 1860;

/// Prices are stored as `NUMERIC(10, 2)` and must stay below this.
pub const PRICE_LIMIT: i64 = 100_000_000;

/// Most fractional digits a price may carry before it is rounded to cents.
const MAX_PRICE_SCALE: i64 = 12;

// Column sizes of the catalog tables.
const NAME_MAX: usize = 255;
const ARTIST_MAX: usize = 255;
const BRAND_MAX: usize = 100;
const COLOR_MAX: usize = 50;

/// Longest running time that fits the `INTEGER` seconds column.
pub const MAX_DURATION_SECONDS: u32 = i32::MAX as u32;

string_enum! {
    /// Discriminator for the concrete product kinds.
    Category {
        Album => "ALBUM",
        Vinyl => "VINYL",
        Headphone => "HEADPHONE",
        Speaker => "SPEAKER",
        Player => "PLAYER",
        Turntable => "TURNTABLE",
        Portable => "PORTABLE",
    }
}

impl Category {
    /// Human-readable singular name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Category::Album => "Album",
            Category::Vinyl => "Vinyl",
            Category::Headphone => "Headphone",
            Category::Speaker => "Speaker",
            Category::Player => "Player",
            Category::Turntable => "Turntable",
            Category::Portable => "Portable",
        }
    }
}

string_enum! {
    AlbumFormat {
        Lp => "LP",
        Ep => "EP",
        Cd => "CD",
        Cassette => "CASSETTE",
        Dvd => "DVD",
        CdDvd => "CD_DVD",
        Boxset => "BOXSET",
    }
}

string_enum! {
    Genre {
        Rock => "ROCK",
        Pop => "POP",
        Jazz => "JAZZ",
        Blues => "BLUES",
        Classical => "CLASSICAL",
        HipHop => "HIP_HOP",
        Electronic => "ELECTRONIC",
        Country => "COUNTRY",
        Reggae => "REGGAE",
        Folk => "FOLK",
        Metal => "METAL",
        Punk => "PUNK",
        Soul => "SOUL",
        Funk => "FUNK",
        Rnb => "RNB",
        Latin => "LATIN",
        Indie => "INDIE",
        Alternative => "ALTERNATIVE",
        Soundtrack => "SOUNDTRACK",
    }
}

string_enum! {
    VinylSize {
        S7 => "S_7",
        S10 => "S_10",
        S12 => "S_12",
    }
}

string_enum! {
    /// Rotational speed. Turntables may support combined speeds; records
    /// are cut at exactly one.
    Rpm {
        Rpm33 => "RPM_33",
        Rpm45 => "RPM_45",
        Rpm78 => "RPM_78",
        Rpm33Or45 => "RPM_33_45",
        Rpm33Or45Or78 => "RPM_33_45_78",
    }
}

impl Rpm {
    pub fn is_single_speed(self) -> bool {
        matches!(self, Rpm::Rpm33 | Rpm::Rpm45 | Rpm::Rpm78)
    }
}

string_enum! {
    HeadphoneType {
        InEar => "IN_EAR",
        OnEar => "ON_EAR",
        OverEar => "OVER_EAR",
    }
}

string_enum! {
    /// Noise cancellation level.
    Anc {
        Off => "NONE",
        Passive => "PASSIVE",
        Active => "ACTIVE",
        ActiveAndPassive => "ACTIVE_AND_PASSIVE",
    }
}

string_enum! {
    PowerType {
        Dc => "DC",
        Ac => "AC",
    }
}

string_enum! {
    /// Water / shock / dust resistance and their combinations.
    Resistance {
        Water => "WATER",
        Shock => "SHOCK",
        Dust => "DUST",
        Ws => "WS",
        Wd => "WD",
        Sd => "SD",
        Wsd => "WSD",
    }
}

string_enum! {
    Traction {
        BeltDrive => "BELT_DRIVE",
        DirectDrive => "DIRECT_DRIVE",
    }
}

string_enum! {
    Mechanism {
        Manual => "MANUAL",
        Automatic => "AUTOMATIC",
        SemiAutomatic => "SEMI_AUTOMATIC",
    }
}

string_enum! {
    PortableType {
        Digital => "DIGITAL",
        Cassette => "CASSETTE",
        Cd => "CD",
    }
}

// ── Album duration ───────────────────────────────────────────────────────────

/// Running time of a release, exchanged as `"mm:ss"` and stored in seconds so
/// that range queries compare numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlbumDuration(u32);

impl AlbumDuration {
    pub fn from_seconds(seconds: u32) -> Self {
        AlbumDuration(seconds.min(MAX_DURATION_SECONDS))
    }

    pub fn seconds(self) -> u32 {
        self.0
    }
}

impl FromStr for AlbumDuration {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || DomainError::validation(format!("duration '{}' must be formatted mm:ss", s));
        let (minutes, seconds) = s.trim().split_once(':').ok_or_else(invalid)?;
        if minutes.is_empty() || seconds.len() != 2 {
            return Err(invalid());
        }
        let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
        let seconds: u32 = seconds.parse().map_err(|_| invalid())?;
        if seconds >= 60 {
            return Err(invalid());
        }
        minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .filter(|total| *total <= MAX_DURATION_SECONDS)
            .map(AlbumDuration)
            .ok_or_else(|| DomainError::validation(format!("duration '{}' is too long", s)))
    }
}

impl fmt::Display for AlbumDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for AlbumDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AlbumDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── Kind-specific attributes ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Album {
    pub artist: String,
    pub year: i32,
    pub format: AlbumFormat,
    pub genre: Genre,
    #[schema(value_type = String, example = "42:10")]
    pub duration: AlbumDuration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Vinyl {
    pub album: Album,
    pub size: VinylSize,
    pub rpm: Rpm,
    pub color: String,
}

/// Attributes shared by headphones and speakers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AudioEquipment {
    pub brand: String,
    pub color: String,
    /// Hours.
    pub battery_life: i32,
    /// Months.
    pub warranty: i32,
    pub microphone_built_in: bool,
    pub wireless: bool,
    pub bluetooth: bool,
    pub usb: bool,
    pub aux: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Headphone {
    pub equipment: AudioEquipment,
    pub headphone_type: HeadphoneType,
    pub anc: Anc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Speaker {
    pub equipment: AudioEquipment,
    pub radio: bool,
    /// Watts.
    pub power: i32,
    /// Ohms.
    pub impedance: i32,
    /// Hz.
    pub min_frequency: i32,
    /// Hz.
    pub max_frequency: i32,
    /// Grams.
    pub weight: i32,
    pub power_type: PowerType,
    pub resistance: Resistance,
}

/// Attributes shared by every playback device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Player {
    pub brand: String,
    pub color: String,
    /// Months.
    pub warranty: i32,
    pub bluetooth: bool,
    pub usb: bool,
    pub radio: bool,
    pub aux: bool,
    pub rca: bool,
    pub built_in_speaker: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Turntable {
    pub player: Player,
    pub has_built_in_pre_amp: bool,
    pub rpm: Rpm,
    pub traction: Traction,
    pub mechanism: Mechanism,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Portable {
    pub player: Player,
    pub portable_type: PortableType,
    pub power_type: PowerType,
    /// Hours.
    pub battery_life: i32,
    pub resistance: Resistance,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ProductKind {
    Album(Album),
    Vinyl(Vinyl),
    Headphone(Headphone),
    Speaker(Speaker),
    /// A plain playback device (CD/media player) with no further refinement.
    Player(Player),
    Turntable(Turntable),
    Portable(Portable),
}

impl ProductKind {
    pub fn category(&self) -> Category {
        match self {
            ProductKind::Album(_) => Category::Album,
            ProductKind::Vinyl(_) => Category::Vinyl,
            ProductKind::Headphone(_) => Category::Headphone,
            ProductKind::Speaker(_) => Category::Speaker,
            ProductKind::Player(_) => Category::Player,
            ProductKind::Turntable(_) => Category::Turntable,
            ProductKind::Portable(_) => Category::Portable,
        }
    }

    /// Checks the kind-specific invariants against the given calendar year.
    pub fn validate(&self, current_year: i32) -> Result<(), DomainError> {
        match self {
            ProductKind::Album(album) => validate_album(album, current_year),
            ProductKind::Vinyl(vinyl) => {
                validate_album(&vinyl.album, current_year)?;
                check_length("color", &vinyl.color, COLOR_MAX)?;
                validate_vinyl_rpm(vinyl.rpm)
            }
            ProductKind::Headphone(headphone) => validate_equipment(&headphone.equipment),
            ProductKind::Speaker(speaker) => {
                validate_equipment(&speaker.equipment)?;
                non_negative("power", speaker.power)?;
                non_negative("impedance", speaker.impedance)?;
                non_negative("min_frequency", speaker.min_frequency)?;
                non_negative("max_frequency", speaker.max_frequency)?;
                non_negative("weight", speaker.weight)?;
                if speaker.min_frequency > speaker.max_frequency {
                    return Err(DomainError::validation(
                        "min_frequency must not exceed max_frequency",
                    ));
                }
                Ok(())
            }
            ProductKind::Player(player) => validate_player(player),
            ProductKind::Turntable(turntable) => validate_player(&turntable.player),
            ProductKind::Portable(portable) => {
                validate_player(&portable.player)?;
                non_negative("battery_life", portable.battery_life)
            }
        }
    }
}

// ── Products ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: BigDecimal,
    pub stock: i32,
    pub kind: ProductKind,
}

impl Product {
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn validate(&self, current_year: i32) -> Result<(), DomainError> {
        validate_base(&self.name, &self.price, self.stock)?;
        self.kind.validate(current_year)
    }
}

/// A product that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: BigDecimal,
    pub stock: i32,
    pub kind: ProductKind,
}

impl NewProduct {
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn validate(&self, current_year: i32) -> Result<(), DomainError> {
        validate_base(&self.name, &self.price, self.stock)?;
        self.kind.validate(current_year)
    }
}

/// Rejects a decimal whose exponent or digit count puts it outside the
/// price column, before anything rescales it.
pub fn check_price_range(field: &str, price: &BigDecimal) -> Result<(), DomainError> {
    let (_, scale) = price.as_bigint_and_exponent();
    if scale > MAX_PRICE_SCALE {
        return Err(DomainError::validation(format!(
            "{} must have at most {} decimal places",
            field, MAX_PRICE_SCALE
        )));
    }
    let integer_digits = i64::try_from(price.digits())
        .unwrap_or(i64::MAX)
        .saturating_sub(scale);
    if integer_digits > 8 {
        return Err(DomainError::validation(format!(
            "{} must be below {}",
            field, PRICE_LIMIT
        )));
    }
    Ok(())
}

/// Rounds a price to cents, half-up.
pub fn round_price(price: &BigDecimal) -> Result<BigDecimal, DomainError> {
    check_price_range("price", price)?;
    Ok(price.with_scale_round(2, RoundingMode::HalfUp))
}

// ── Validation ───────────────────────────────────────────────────────────────

pub fn validate_year(year: i32, current_year: i32) -> Result<(), DomainError> {
    if !(MIN_RELEASE_YEAR..=current_year).contains(&year) {
        return Err(DomainError::validation(format!(
            "year {} must be between {} and {}",
            year, MIN_RELEASE_YEAR, current_year
        )));
    }
    Ok(())
}

pub fn validate_vinyl_rpm(rpm: Rpm) -> Result<(), DomainError> {
    if !rpm.is_single_speed() {
        return Err(DomainError::validation(format!(
            "vinyl rpm must be one of RPM_33, RPM_45, RPM_78 (got {})",
            rpm
        )));
    }
    Ok(())
}

fn validate_base(name: &str, price: &BigDecimal, stock: i32) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name must not be empty"));
    }
    check_length("name", name, NAME_MAX)?;
    if price < &BigDecimal::zero() {
        return Err(DomainError::validation("price must not be negative"));
    }
    check_price_range("price", price)?;
    if price >= &BigDecimal::from(PRICE_LIMIT) {
        return Err(DomainError::validation(format!(
            "price must be below {}",
            PRICE_LIMIT
        )));
    }
    non_negative("stock", stock)
}

fn validate_album(album: &Album, current_year: i32) -> Result<(), DomainError> {
    if album.artist.trim().is_empty() {
        return Err(DomainError::validation("artist must not be empty"));
    }
    check_length("artist", &album.artist, ARTIST_MAX)?;
    validate_year(album.year, current_year)
}

fn validate_equipment(equipment: &AudioEquipment) -> Result<(), DomainError> {
    check_length("brand", &equipment.brand, BRAND_MAX)?;
    check_length("color", &equipment.color, COLOR_MAX)?;
    non_negative("battery_life", equipment.battery_life)?;
    non_negative("warranty", equipment.warranty)
}

fn validate_player(player: &Player) -> Result<(), DomainError> {
    check_length("brand", &player.brand, BRAND_MAX)?;
    check_length("color", &player.color, COLOR_MAX)?;
    non_negative("warranty", player.warranty)
}

fn non_negative(field: &str, value: i32) -> Result<(), DomainError> {
    if value < 0 {
        return Err(DomainError::validation(format!("{} must not be negative", field)));
    }
    Ok(())
}
