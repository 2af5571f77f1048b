//! Envoltorios de respuesta del backend
//!
//! Los listados llegan como `{ results, count }` y algunas acciones de
//! planes devuelven `{ data }`.

use serde::{Deserialize, Serialize};

/// Página de resultados
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub results: Vec<T>,
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> Paginated<T> {
    /// Transformar cada elemento conservando la paginación
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            results: self.results.into_iter().map(f).collect(),
            count: self.count,
            next: self.next,
            previous: self.previous,
        }
    }
}

/// Envoltorio `{ data }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Filtros de listado reenviados al backend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub asset: Option<String>,
    pub ordering: Option<String>,
}

impl ListQuery {
    /// Pares `clave=valor` para la query string, omitiendo los vacíos
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("page_size", page_size.to_string()));
        }
        let text_filters = [
            ("search", &self.search),
            ("status", &self.status),
            ("priority", &self.priority),
            ("asset", &self.asset),
            ("ordering", &self.ordering),
        ];
        for (key, value) in text_filters {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, value.to_string()));
            }
        }
        pairs
    }
}
