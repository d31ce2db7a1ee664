//! Built-in example queries.
//!
//! A short, ordered catalog of statements in the engine's dialect. Selecting
//! an entry copies its SQL verbatim into the query text.

use crate::pagination::{Page, PageCursor};

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleQuery {
    pub title: &'static str,
    pub sql: &'static str,
}

/// The catalog, in display order.
pub const EXAMPLE_QUERIES: &[ExampleQuery] = &[
    ExampleQuery {
        title: "Create a table",
        sql: "CREATE TABLE Restaurantes (
    id INT KEY INDEX BPlusTree,
    nombre VARCHAR[20] INDEX BPlusTree,
    fechaRegistro DATE,
    ubicacion ARRAY[FLOAT]
);",
    },
    ExampleQuery {
        title: "Insert a row",
        sql: "INSERT INTO Restaurantes VALUES (1, 'El Buen Sabor', '2024-01-01', '10.5,20.3');",
    },
    ExampleQuery {
        title: "Select everything",
        sql: "SELECT * FROM Restaurantes;",
    },
    ExampleQuery {
        title: "Point lookup",
        sql: "SELECT * FROM Restaurantes WHERE id = 1;",
    },
    ExampleQuery {
        title: "Range scan",
        sql: "SELECT * FROM Restaurantes WHERE id BETWEEN 1 AND 10;",
    },
    ExampleQuery {
        title: "Spatial search",
        sql: "SELECT * FROM Restaurantes WHERE ubicacion IN (POINT(10.5, 20.3), 5);",
    },
    ExampleQuery {
        title: "Import from CSV",
        sql: "CREATE TABLE cars FROM FILE 'car_prices_jordan.csv' USING INDEX BPlusTree('id');",
    },
    ExampleQuery {
        title: "Delete a row",
        sql: "DELETE FROM Restaurantes WHERE id = 1;",
    },
    ExampleQuery {
        title: "Drop a table",
        sql: "DROP TABLE Restaurantes;",
    },
];

/// Paged view over [`EXAMPLE_QUERIES`].
#[derive(Debug, Clone)]
pub struct ExampleCatalog {
    cursor: PageCursor,
}

impl ExampleCatalog {
    pub fn new(page_size: usize) -> Self {
        Self {
            cursor: PageCursor::new(page_size),
        }
    }

    pub fn entries(&self) -> &'static [ExampleQuery] {
        EXAMPLE_QUERIES
    }

    pub fn cursor_mut(&mut self) -> &mut PageCursor {
        &mut self.cursor
    }

    /// Current page of examples.
    pub fn page(&self) -> Page<'static, ExampleQuery> {
        self.cursor.page(EXAMPLE_QUERIES)
    }

    /// SQL of the entry at `index` on the current page, passed to `apply`.
    ///
    /// Returns `false` if the page has no such entry.
    pub fn select(&self, index: usize, apply: impl FnOnce(&'static str)) -> bool {
        match self.page().items.get(index) {
            Some(example) => {
                apply(example.sql);
                true
            }
            None => false,
        }
    }
}
