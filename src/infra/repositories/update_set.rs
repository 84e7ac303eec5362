//! Typed partial-update builder.
//!
//! Collects `(column, value)` pairs for the fields a caller supplied and
//! renders them as one parameterized `UPDATE ... SET ... WHERE ...`.

use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ConnectionTrait, EntityTrait, QueryFilter, UpdateMany, Value};

use crate::errors::AppResult;

pub struct UpdateSet<E: EntityTrait> {
    values: Vec<(E::Column, Value)>,
}

impl<E: EntityTrait> Default for UpdateSet<E> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

impl<E: EntityTrait> UpdateSet<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always include `column`.
    pub fn set(&mut self, column: E::Column, value: impl Into<Value>) -> &mut Self {
        self.values.push((column, value.into()));
        self
    }

    /// Include `column` only when a value was supplied.
    pub fn set_opt<V: Into<Value>>(&mut self, column: E::Column, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.values.push((column, value.into()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Render the statement without a filter.
    pub fn into_update(self) -> UpdateMany<E> {
        self.values
            .into_iter()
            .fold(E::update_many(), |update, (column, value)| {
                update.col_expr(column, SimpleExpr::from(Expr::value(value)))
            })
    }

    /// Execute against the rows matching `filter`. An empty set is a no-op.
    pub async fn exec<C, F>(self, conn: &C, filter: F) -> AppResult<u64>
    where
        C: ConnectionTrait,
        F: sea_orm::sea_query::IntoCondition,
    {
        if self.is_empty() {
            return Ok(0);
        }
        let result = self.into_update().filter(filter).exec(conn).await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::entities::cabinet;
    use sea_orm::{ColumnTrait, DbBackend, QueryTrait};

    #[test]
    fn test_only_supplied_fields_are_rendered() {
        let mut set = UpdateSet::<cabinet::Entity>::new();
        set.set_opt(cabinet::Column::Location, Some("B-02"))
            .set_opt(cabinet::Column::Model, None::<String>)
            .set(cabinet::Column::ZoneId, None::<i32>);

        assert_eq!(set.len(), 2);
        let sql = set
            .into_update()
            .filter(cabinet::Column::Id.eq(7))
            .build(DbBackend::MySql)
            .to_string();

        assert!(sql.starts_with("UPDATE `cabinets` SET"));
        assert!(sql.contains("`location` = 'B-02'"));
        assert!(sql.contains("`zone_id` = NULL"));
        assert!(!sql.contains("`model`"));
        assert!(sql.ends_with("WHERE `cabinets`.`id` = 7"));
    }

    #[test]
    fn test_empty_set() {
        let set = UpdateSet::<cabinet::Entity>::new();
        assert!(set.is_empty());
    }
}
