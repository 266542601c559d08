use std::collections::HashMap;

use chrono::Utc;
use diesel::dsl::exists;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};

use crate::db::DbPool;
use crate::domain::catalog::{Category, NewProduct, Product, ProductKind};
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product_query::ProductQuery;
use crate::schema::{
    albums, audio_equipment, headphones, order_products, players, portables, products, speakers,
    turntables, vinyls, wishlist_products,
};

use super::models::{
    column, duration_column, AlbumRow, AudioEquipmentRow, HeadphoneRow, NewProductRow, PlayerRow,
    PortableRow, ProductChangeset, ProductRow, SpeakerRow, TurntableRow, VinylRow,
};

diesel::define_sql_function! {
    fn lower(x: Text) -> Text;
}

/// Products are stored joined-table style: one `products` row with the
/// shared fields and the category, plus one row per refinement level
/// (`albums` + `vinyls` for a vinyl, `players` + `turntables` for a
/// turntable, ...).
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for DieselProductRepository {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = diesel::insert_into(products::table)
                .values(&NewProductRow {
                    name: product.name.clone(),
                    price: product.price.clone(),
                    stock: product.stock,
                    category: product.category().as_str().to_string(),
                })
                .returning(ProductRow::as_returning())
                .get_result(conn)?;

            insert_details(conn, row.id, &product.kind)?;

            Ok(Product {
                id: row.id,
                name: row.name,
                price: row.price,
                stock: row.stock,
                kind: product.kind,
            })
        })
    }

    fn update(&self, product: &Product) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = diesel::update(products::table.find(product.id))
                .set(&ProductChangeset {
                    name: product.name.clone(),
                    price: product.price.clone(),
                    stock: product.stock,
                    updated_at: Utc::now(),
                })
                .returning(ProductRow::as_returning())
                .get_result(conn)
                .optional()?
                .ok_or_else(|| DomainError::not_found("Product", product.id))?;

            update_details(conn, product.id, &product.kind)?;

            Ok(Product {
                id: row.id,
                name: row.name,
                price: row.price,
                stock: row.stock,
                kind: product.kind.clone(),
            })
        })
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(assemble(&mut conn, vec![row])?.pop())
    }

    fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = filtered(&mut conn, query)?
            .select(ProductRow::as_select())
            .order(products::id.asc())
            .load(&mut conn)?;

        assemble(&mut conn, rows)
    }

    fn count(&self, query: &ProductQuery) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;

        Ok(filtered(&mut conn, query)?.count().get_result(&mut conn)?)
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        // Detail rows go with the product (ON DELETE CASCADE); order and
        // wishlist lines are RESTRICT and surface as a conflict.
        let deleted = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }

    fn is_ordered(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        Ok(diesel::select(exists(
            order_products::table.filter(order_products::product_id.eq(id)),
        ))
        .get_result(&mut conn)?)
    }

    fn is_wishlisted(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        Ok(diesel::select(exists(
            wishlist_products::table.filter(wishlist_products::product_id.eq(id)),
        ))
        .get_result(&mut conn)?)
    }
}

// ── Writes ───────────────────────────────────────────────────────────────────

fn insert_details(
    conn: &mut PgConnection,
    id: i64,
    kind: &ProductKind,
) -> Result<(), DomainError> {
    match kind {
        ProductKind::Album(album) => {
            diesel::insert_into(albums::table)
                .values(&AlbumRow::from_domain(id, album)?)
                .execute(conn)?;
        }
        ProductKind::Vinyl(vinyl) => {
            diesel::insert_into(albums::table)
                .values(&AlbumRow::from_domain(id, &vinyl.album)?)
                .execute(conn)?;
            diesel::insert_into(vinyls::table)
                .values(&VinylRow::from_domain(id, vinyl))
                .execute(conn)?;
        }
        ProductKind::Headphone(headphone) => {
            diesel::insert_into(audio_equipment::table)
                .values(&AudioEquipmentRow::from_domain(id, &headphone.equipment))
                .execute(conn)?;
            diesel::insert_into(headphones::table)
                .values(&HeadphoneRow::from_domain(id, headphone))
                .execute(conn)?;
        }
        ProductKind::Speaker(speaker) => {
            diesel::insert_into(audio_equipment::table)
                .values(&AudioEquipmentRow::from_domain(id, &speaker.equipment))
                .execute(conn)?;
            diesel::insert_into(speakers::table)
                .values(&SpeakerRow::from_domain(id, speaker))
                .execute(conn)?;
        }
        ProductKind::Player(player) => {
            diesel::insert_into(players::table)
                .values(&PlayerRow::from_domain(id, player))
                .execute(conn)?;
        }
        ProductKind::Turntable(turntable) => {
            diesel::insert_into(players::table)
                .values(&PlayerRow::from_domain(id, &turntable.player))
                .execute(conn)?;
            diesel::insert_into(turntables::table)
                .values(&TurntableRow::from_domain(id, turntable))
                .execute(conn)?;
        }
        ProductKind::Portable(portable) => {
            diesel::insert_into(players::table)
                .values(&PlayerRow::from_domain(id, &portable.player))
                .execute(conn)?;
            diesel::insert_into(portables::table)
                .values(&PortableRow::from_domain(id, portable))
                .execute(conn)?;
        }
    }
    Ok(())
}

fn update_details(
    conn: &mut PgConnection,
    id: i64,
    kind: &ProductKind,
) -> Result<(), DomainError> {
    match kind {
        ProductKind::Album(album) => {
            diesel::update(albums::table.find(id))
                .set(&AlbumRow::from_domain(id, album)?)
                .execute(conn)?;
        }
        ProductKind::Vinyl(vinyl) => {
            diesel::update(albums::table.find(id))
                .set(&AlbumRow::from_domain(id, &vinyl.album)?)
                .execute(conn)?;
            diesel::update(vinyls::table.find(id))
                .set(&VinylRow::from_domain(id, vinyl))
                .execute(conn)?;
        }
        ProductKind::Headphone(headphone) => {
            diesel::update(audio_equipment::table.find(id))
                .set(&AudioEquipmentRow::from_domain(id, &headphone.equipment))
                .execute(conn)?;
            diesel::update(headphones::table.find(id))
                .set(&HeadphoneRow::from_domain(id, headphone))
                .execute(conn)?;
        }
        ProductKind::Speaker(speaker) => {
            diesel::update(audio_equipment::table.find(id))
                .set(&AudioEquipmentRow::from_domain(id, &speaker.equipment))
                .execute(conn)?;
            diesel::update(speakers::table.find(id))
                .set(&SpeakerRow::from_domain(id, speaker))
                .execute(conn)?;
        }
        ProductKind::Player(player) => {
            diesel::update(players::table.find(id))
                .set(&PlayerRow::from_domain(id, player))
                .execute(conn)?;
        }
        ProductKind::Turntable(turntable) => {
            diesel::update(players::table.find(id))
                .set(&PlayerRow::from_domain(id, &turntable.player))
                .execute(conn)?;
            diesel::update(turntables::table.find(id))
                .set(&TurntableRow::from_domain(id, turntable))
                .execute(conn)?;
        }
        ProductKind::Portable(portable) => {
            diesel::update(players::table.find(id))
                .set(&PlayerRow::from_domain(id, &portable.player))
                .execute(conn)?;
            diesel::update(portables::table.find(id))
                .set(&PortableRow::from_domain(id, portable))
                .execute(conn)?;
        }
    }
    Ok(())
}

// ── Reads ────────────────────────────────────────────────────────────────────

/// `%value%` with the LIKE metacharacters in `value` matched literally.
fn contains(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Builds the `products` query for `query`.
///
/// Attribute filters are resolved to product id sets up front (one query per
/// refinement table involved) and intersected through `id IN (...)`.
fn filtered(
    conn: &mut PgConnection,
    query: &ProductQuery,
) -> Result<products::BoxedQuery<'static, Pg>, DomainError> {
    let mut boxed: products::BoxedQuery<'static, Pg> = products::table.into_boxed();

    if let Some(category) = query.category {
        boxed = boxed.filter(products::category.eq(category.as_str()));
    }
    if let Some(name) = &query.name {
        boxed = boxed.filter(products::name.ilike(contains(name)));
    }
    if let Some(min) = &query.min_price {
        boxed = boxed.filter(products::price.ge(min.clone()));
    }
    if let Some(max) = &query.max_price {
        boxed = boxed.filter(products::price.le(max.clone()));
    }
    match query.in_stock {
        Some(true) => boxed = boxed.filter(products::stock.gt(0)),
        Some(false) => boxed = boxed.filter(products::stock.eq(0)),
        None => {}
    }

    for ids in attribute_matches(conn, query)? {
        boxed = boxed.filter(products::id.eq_any(ids));
    }

    Ok(boxed)
}

fn attribute_matches(
    conn: &mut PgConnection,
    query: &ProductQuery,
) -> Result<Vec<Vec<i64>>, DomainError> {
    let mut sets = Vec::new();

    let album_filtered = query.artist.is_some()
        || query.genre.is_some()
        || query.format.is_some()
        || query.min_year.is_some()
        || query.max_year.is_some()
        || query.min_duration.is_some()
        || query.max_duration.is_some();
    if album_filtered {
        let mut ids: albums::BoxedQuery<'static, Pg, BigInt> =
            albums::table.select(albums::product_id).into_boxed();
        if let Some(artist) = &query.artist {
            ids = ids.filter(albums::artist.ilike(contains(artist)));
        }
        if let Some(genre) = query.genre {
            ids = ids.filter(albums::genre.eq(genre.as_str()));
        }
        if let Some(format) = query.format {
            ids = ids.filter(albums::format.eq(format.as_str()));
        }
        if let Some(min) = query.min_year {
            ids = ids.filter(albums::year.ge(min));
        }
        if let Some(max) = query.max_year {
            ids = ids.filter(albums::year.le(max));
        }
        if let Some(min) = query.min_duration {
            ids = ids.filter(albums::duration_seconds.ge(duration_column(min)?));
        }
        if let Some(max) = query.max_duration {
            ids = ids.filter(albums::duration_seconds.le(duration_column(max)?));
        }
        sets.push(ids.load(conn)?);
    }

    if let Some(size) = query.size {
        sets.push(
            vinyls::table
                .filter(vinyls::size.eq(size.as_str()))
                .select(vinyls::product_id)
                .load(conn)?,
        );
    }

    if let Some(rpm) = query.rpm {
        let mut ids: Vec<i64> = vinyls::table
            .filter(vinyls::rpm.eq(rpm.as_str()))
            .select(vinyls::product_id)
            .load(conn)?;
        ids.extend(
            turntables::table
                .filter(turntables::rpm.eq(rpm.as_str()))
                .select(turntables::product_id)
                .load::<i64>(conn)?,
        );
        sets.push(ids);
    }

    if let Some(color) = &query.color {
        let mut ids: Vec<i64> = vinyls::table
            .filter(lower(vinyls::color).eq(lower(color.clone())))
            .select(vinyls::product_id)
            .load(conn)?;
        ids.extend(
            players::table
                .filter(lower(players::color).eq(lower(color.clone())))
                .select(players::product_id)
                .load::<i64>(conn)?,
        );
        ids.extend(
            audio_equipment::table
                .filter(lower(audio_equipment::color).eq(lower(color.clone())))
                .select(audio_equipment::product_id)
                .load::<i64>(conn)?,
        );
        sets.push(ids);
    }

    if let Some(brand) = &query.brand {
        let mut ids: Vec<i64> = players::table
            .filter(lower(players::brand).eq(lower(brand.clone())))
            .select(players::product_id)
            .load(conn)?;
        ids.extend(
            audio_equipment::table
                .filter(lower(audio_equipment::brand).eq(lower(brand.clone())))
                .select(audio_equipment::product_id)
                .load::<i64>(conn)?,
        );
        sets.push(ids);
    }

    if let Some(headphone_type) = query.headphone_type {
        sets.push(
            headphones::table
                .filter(headphones::headphone_type.eq(headphone_type.as_str()))
                .select(headphones::product_id)
                .load(conn)?,
        );
    }

    if let Some(anc) = query.anc {
        sets.push(
            headphones::table
                .filter(headphones::anc.eq(anc.as_str()))
                .select(headphones::product_id)
                .load(conn)?,
        );
    }

    if let Some(wireless) = query.wireless {
        sets.push(
            audio_equipment::table
                .filter(audio_equipment::wireless.eq(wireless))
                .select(audio_equipment::product_id)
                .load(conn)?,
        );
    }

    if let Some(bluetooth) = query.bluetooth {
        let mut ids: Vec<i64> = audio_equipment::table
            .filter(audio_equipment::bluetooth.eq(bluetooth))
            .select(audio_equipment::product_id)
            .load(conn)?;
        ids.extend(
            players::table
                .filter(players::bluetooth.eq(bluetooth))
                .select(players::product_id)
                .load::<i64>(conn)?,
        );
        sets.push(ids);
    }

    if query.min_power.is_some() || query.max_power.is_some() {
        let mut ids: speakers::BoxedQuery<'static, Pg, BigInt> =
            speakers::table.select(speakers::product_id).into_boxed();
        if let Some(min) = query.min_power {
            ids = ids.filter(speakers::power.ge(min));
        }
        if let Some(max) = query.max_power {
            ids = ids.filter(speakers::power.le(max));
        }
        sets.push(ids.load(conn)?);
    }

    if let Some(traction) = query.traction {
        sets.push(
            turntables::table
                .filter(turntables::traction.eq(traction.as_str()))
                .select(turntables::product_id)
                .load(conn)?,
        );
    }

    if let Some(mechanism) = query.mechanism {
        sets.push(
            turntables::table
                .filter(turntables::mechanism.eq(mechanism.as_str()))
                .select(turntables::product_id)
                .load(conn)?,
        );
    }

    if let Some(portable_type) = query.portable_type {
        sets.push(
            portables::table
                .filter(portables::portable_type.eq(portable_type.as_str()))
                .select(portables::product_id)
                .load(conn)?,
        );
    }

    Ok(sets)
}

fn keyed<T>(rows: Vec<T>, key: impl Fn(&T) -> i64) -> HashMap<i64, T> {
    rows.into_iter().map(|row| (key(&row), row)).collect()
}

fn take<T>(rows: &mut HashMap<i64, T>, id: i64, table: &str) -> Result<T, DomainError> {
    rows.remove(&id)
        .ok_or_else(|| DomainError::Internal(format!("product {} has no {} row", id, table)))
}

/// Loads the refinement rows for `rows` (one query per table) and builds the
/// domain products, preserving the order of `rows`.
fn assemble(conn: &mut PgConnection, rows: Vec<ProductRow>) -> Result<Vec<Product>, DomainError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

    let mut album_rows = keyed(
        albums::table
            .filter(albums::product_id.eq_any(&ids))
            .select(AlbumRow::as_select())
            .load(conn)?,
        |r| r.product_id,
    );
    let mut vinyl_rows = keyed(
        vinyls::table
            .filter(vinyls::product_id.eq_any(&ids))
            .select(VinylRow::as_select())
            .load(conn)?,
        |r| r.product_id,
    );
    let mut equipment_rows = keyed(
        audio_equipment::table
            .filter(audio_equipment::product_id.eq_any(&ids))
            .select(AudioEquipmentRow::as_select())
            .load(conn)?,
        |r| r.product_id,
    );
    let mut headphone_rows = keyed(
        headphones::table
            .filter(headphones::product_id.eq_any(&ids))
            .select(HeadphoneRow::as_select())
            .load(conn)?,
        |r| r.product_id,
    );
    let mut speaker_rows = keyed(
        speakers::table
            .filter(speakers::product_id.eq_any(&ids))
            .select(SpeakerRow::as_select())
            .load(conn)?,
        |r| r.product_id,
    );
    let mut player_rows = keyed(
        players::table
            .filter(players::product_id.eq_any(&ids))
            .select(PlayerRow::as_select())
            .load(conn)?,
        |r| r.product_id,
    );
    let mut turntable_rows = keyed(
        turntables::table
            .filter(turntables::product_id.eq_any(&ids))
            .select(TurntableRow::as_select())
            .load(conn)?,
        |r| r.product_id,
    );
    let mut portable_rows = keyed(
        portables::table
            .filter(portables::product_id.eq_any(&ids))
            .select(PortableRow::as_select())
            .load(conn)?,
        |r| r.product_id,
    );

    rows.into_iter()
        .map(|row| {
            let id = row.id;
            let kind = match column::<Category>(&row.category)? {
                Category::Album => {
                    ProductKind::Album(take(&mut album_rows, id, "albums")?.into_domain()?)
                }
                Category::Vinyl => {
                    let album = take(&mut album_rows, id, "albums")?.into_domain()?;
                    ProductKind::Vinyl(take(&mut vinyl_rows, id, "vinyls")?.into_domain(album)?)
                }
                Category::Headphone => {
                    let equipment = take(&mut equipment_rows, id, "audio_equipment")?.into_domain();
                    ProductKind::Headphone(
                        take(&mut headphone_rows, id, "headphones")?.into_domain(equipment)?,
                    )
                }
                Category::Speaker => {
                    let equipment = take(&mut equipment_rows, id, "audio_equipment")?.into_domain();
                    ProductKind::Speaker(
                        take(&mut speaker_rows, id, "speakers")?.into_domain(equipment)?,
                    )
                }
                Category::Player => {
                    ProductKind::Player(take(&mut player_rows, id, "players")?.into_domain())
                }
                Category::Turntable => {
                    let player = take(&mut player_rows, id, "players")?.into_domain();
                    ProductKind::Turntable(
                        take(&mut turntable_rows, id, "turntables")?.into_domain(player)?,
                    )
                }
                Category::Portable => {
                    let player = take(&mut player_rows, id, "players")?.into_domain();
                    ProductKind::Portable(
                        take(&mut portable_rows, id, "portables")?.into_domain(player)?,
                    )
                }
            };
            Ok(Product {
                id,
                name: row.name,
                price: row.price,
                stock: row.stock,
                kind,
            })
        })
        .collect()
}
