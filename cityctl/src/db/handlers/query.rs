//! Query composition for paginated city listings.
//!
//! A [`CityQuery`] describes *which* cities a request selects (the predicate) and *which page*
//! of them it wants. Both the page query and the total-count query are rendered from the same
//! value by [`CityQuery::list_query`] and [`CityQuery::count_query`], which share a single
//! FROM/JOIN/WHERE renderer. The count can therefore never disagree with the filter used for
//! the page.
//!
//! ```text
//! list:  SELECT DISTINCT c.id, c.hex, c.updated_at, c.deleted_at <source> ORDER BY c.id ASC LIMIT ? OFFSET ?
//! count: SELECT COUNT(DISTINCT c.id) <source>
//! ```

use crate::types::{fold_name, normalize_lang};
use sqlx::{QueryBuilder, Sqlite};

/// Which cities a list or count query selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityPredicate {
    /// Every visible city, joined to all of its translations
    All,
    /// Cities having a translation in `lang` whose name contains `name`, case-insensitively
    NameInLanguage { name: String, lang: String },
}

/// Predicate plus page window for city listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    pub skip: i64,
    pub limit: i64,
    pub predicate: CityPredicate,
}

impl CityQuery {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            predicate: CityPredicate::All,
        }
    }

    /// Restrict to cities with a `lang` translation containing `name`
    pub fn with_name_in_language(mut self, name: &str, lang: &str) -> Self {
        self.predicate = CityPredicate::NameInLanguage {
            name: name.to_string(),
            lang: normalize_lang(lang),
        };
        self
    }

    /// Language whose translations are eagerly attached to each result, `None` meaning all
    pub fn translation_lang(&self) -> Option<&str> {
        match &self.predicate {
            CityPredicate::All => None,
            CityPredicate::NameInLanguage { lang, .. } => Some(lang),
        }
    }

    /// Page query: distinct city columns, ordered by id, windowed by skip/limit
    pub fn list_query(&self) -> QueryBuilder<'static, Sqlite> {
        let mut query = QueryBuilder::new("SELECT DISTINCT c.id, c.hex, c.updated_at, c.deleted_at");
        self.push_source(&mut query);
        query.push(" ORDER BY c.id ASC LIMIT ");
        query.push_bind(self.limit);
        query.push(" OFFSET ");
        query.push_bind(self.skip);
        query
    }

    /// Count query over the same source as [`Self::list_query`], without the window
    pub fn count_query(&self) -> QueryBuilder<'static, Sqlite> {
        let mut query = QueryBuilder::new("SELECT COUNT(DISTINCT c.id)");
        self.push_source(&mut query);
        query
    }

    fn push_source(&self, query: &mut QueryBuilder<'static, Sqlite>) {
        match &self.predicate {
            CityPredicate::All => {
                query.push(" FROM cities c LEFT JOIN city_translations ct ON ct.city_id = c.id");
                query.push(" WHERE c.deleted_at IS NULL");
            }
            CityPredicate::NameInLanguage { name, lang } => {
                query.push(" FROM cities c JOIN city_translations ct ON ct.city_id = c.id");
                query.push(" WHERE c.deleted_at IS NULL AND ct.name_folded LIKE ");
                query.push_bind(contains_pattern(name));
                query.push(" ESCAPE '\\' AND ct.lang = ");
                query.push_bind(lang.clone());
            }
        }
    }
}

/// LIKE pattern matching any folded name containing `needle` (folded with [`fold_name`]), with
/// LIKE wildcards in the needle matched literally. Pair with `ESCAPE '\'`.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in fold_name(needle).chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
