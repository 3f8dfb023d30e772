// SPDX-FileCopyrightText: 2025 The bazaar authors
// SPDX-License-Identifier: MIT

//! Database schema definitions for the item catalog.

/// Catalog schema SQL (category, items).
///
/// `autoincrement` keeps identifiers of the highest rows from being handed
/// out again, so an item id stays unique for the lifetime of the file.
pub const SCHEMA_SQL: &str = r#"
create table if not exists category (
    id   integer primary key autoincrement not null,
    name text unique not null
);

create table if not exists items (
    id          integer primary key autoincrement not null,
    name        text not null,
    category_id integer not null,
    image_name  text not null,
    foreign key (category_id) references category(id) on delete restrict
);

create index if not exists IndexItemsCategory on items(category_id);
"#;
