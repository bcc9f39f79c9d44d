// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product reads and the multi-attribute search filter.
//!
//! Text filters match case-insensitively as substrings
//! (`lower(col) LIKE '%' || lower(?) || '%'`), mirroring the relational
//! `ilike` semantics of the source system. Every result set is ordered by
//! ascending price.

use divano_core::{DivanoError, Product, ProductFilter};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

const PRODUCT_COLUMNS: &str = "id, product_code, category_id, name, description, price, \
     manufacturer, size, city, form, mechanism, filling, lifting_mechanism, has_box, \
     image_path, created_at, updated_at";

pub(crate) fn map_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        product_code: row.get(1)?,
        category_id: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        price: row.get(5)?,
        manufacturer: row.get(6)?,
        size: row.get(7)?,
        city: row.get(8)?,
        form: row.get(9)?,
        mechanism: row.get(10)?,
        filling: row.get(11)?,
        lifting_mechanism: row.get(12)?,
        has_box: row.get(13)?,
        image_path: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

/// Products in a category, cheapest first.
pub async fn products_by_category(
    db: &Database,
    category_id: i64,
) -> Result<Vec<Product>, DivanoError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = ?1 ORDER BY price ASC"
            ))?;
            let rows = stmt.query_map(params![category_id], map_product)?;
            let mut products = Vec::new();
            for row in rows {
                products.push(row?);
            }
            Ok(products)
        })
        .await
        .map_err(map_tr_err)
}

/// A product by primary key.
pub async fn product_by_id(db: &Database, id: i64) -> Result<Option<Product>, DivanoError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"))?;
            match stmt.query_row(params![id], map_product) {
                Ok(product) => Ok(Some(product)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// A product by its unique human-readable code (exact match).
pub async fn product_by_code(db: &Database, code: &str) -> Result<Option<Product>, DivanoError> {
    let code = code.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_code = ?1"
            ))?;
            match stmt.query_row(params![code], map_product) {
                Ok(product) => Ok(Some(product)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Filtered search across all product attributes, cheapest first.
pub async fn search_products(
    db: &Database,
    filter: &ProductFilter,
) -> Result<Vec<Product>, DivanoError> {
    let filter = filter.clone();
    db.connection()
        .call(move |conn| {
            let mut sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE 1=1");
            let mut args: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

            if let Some(category_id) = filter.category_id {
                sql.push_str(" AND category_id = ?");
                args.push(Box::new(category_id));
            }
            if let Some(max_price) = filter.max_price {
                sql.push_str(" AND price <= ?");
                args.push(Box::new(max_price));
            }
            for (column, value) in [
                ("manufacturer", &filter.manufacturer),
                ("city", &filter.city),
                ("name", &filter.name),
                ("product_code", &filter.code),
                ("form", &filter.form),
                ("mechanism", &filter.mechanism),
                ("filling", &filter.filling),
            ] {
                if let Some(value) = value {
                    sql.push_str(&format!(
                        " AND lower({column}) LIKE '%' || lower(?) || '%'"
                    ));
                    args.push(Box::new(value.clone()));
                }
            }
            if let Some(flag) = filter.lifting_mechanism {
                sql.push_str(" AND lifting_mechanism = ?");
                args.push(Box::new(flag));
            }
            if let Some(flag) = filter.has_box {
                sql.push_str(" AND has_box = ?");
                args.push(Box::new(flag));
            }
            sql.push_str(" ORDER BY price ASC");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
                map_product,
            )?;
            let mut products = Vec::new();
            for row in rows {
                products.push(row?);
            }
            Ok(products)
        })
        .await
        .map_err(map_tr_err)
}

/// Distinct non-empty manufacturers across all products.
pub async fn distinct_manufacturers(db: &Database) -> Result<Vec<String>, DivanoError> {
    distinct_column(db, "manufacturer").await
}

/// Distinct non-empty cities across all products.
pub async fn distinct_product_cities(db: &Database) -> Result<Vec<String>, DivanoError> {
    distinct_column(db, "city").await
}

async fn distinct_column(db: &Database, column: &'static str) -> Result<Vec<String>, DivanoError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT DISTINCT {column} FROM products \
                 WHERE {column} IS NOT NULL AND {column} != '' ORDER BY {column}"
            ))?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            let mut values = Vec::new();
            for row in rows {
                values.push(row?);
            }
            Ok(values)
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a product (the `id` field of the argument is ignored), returning
/// it with its assigned id.
pub async fn insert_product(db: &Database, product: &Product) -> Result<Product, DivanoError> {
    let mut product = product.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO products (product_code, category_id, name, description, price, \
                 manufacturer, size, city, form, mechanism, filling, lifting_mechanism, \
                 has_box, image_path, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    product.product_code,
                    product.category_id,
                    product.name,
                    product.description,
                    product.price,
                    product.manufacturer,
                    product.size,
                    product.city,
                    product.form,
                    product.mechanism,
                    product.filling,
                    product.lifting_mechanism,
                    product.has_box,
                    product.image_path,
                    product.created_at,
                    product.updated_at,
                ],
            )?;
            product.id = conn.last_insert_rowid();
            Ok(product)
        })
        .await
        .map_err(map_tr_err)
}
