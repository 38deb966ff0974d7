//! Symbol to order book registry

use crate::orderbook::OrderBook;
use crate::symbol::Symbol;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Owns one order book per symbol, creating books on first reference.
#[derive(Default)]
pub struct OrderBookRegistry {
    books: DashMap<Symbol, Arc<OrderBook>>,
}

impl OrderBookRegistry {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
        }
    }

    /// Returns the book for `symbol`, creating it if needed.
    ///
    /// Creation happens under the map's entry lock, so concurrent first
    /// references all observe the same book.
    pub fn get_or_create(&self, symbol: Symbol) -> Arc<OrderBook> {
        if let Some(book) = self.books.get(&symbol) {
            return Arc::clone(book.value());
        }
        self.books
            .entry(symbol)
            .or_insert_with(|| {
                debug!("Creating order book for {}", symbol);
                Arc::new(OrderBook::new(symbol))
            })
            .value()
            .clone()
    }

    /// The book for `symbol` if it has been created
    pub fn get(&self, symbol: Symbol) -> Option<Arc<OrderBook>> {
        self.books.get(&symbol).map(|book| Arc::clone(book.value()))
    }

    /// Point-in-time list of the current books. Books created afterwards are
    /// not included.
    pub fn all_books(&self) -> Vec<Arc<OrderBook>> {
        let mut books: Vec<Arc<OrderBook>> = self
            .books
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        books.sort_by_key(|book| book.symbol());
        books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
