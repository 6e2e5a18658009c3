use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Affiliate dashboard rollup: totals, profit and a per-platform breakdown.
#[derive(Debug, Serialize)]
pub struct AffiliateStats {
    pub total_sales: Decimal,
    pub total_expenses: Decimal,
    pub profit: Decimal,
    pub sales_count: i64,
    pub by_platform: Vec<PlatformStat>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct PlatformStat {
    pub platform: String,
    pub total: Decimal,
    pub count: i64,
}

/// Financial tracker rollup: income/expense totals and per-category spend.
#[derive(Debug, Serialize)]
pub struct FinanceStats {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net: Decimal,
    pub by_category: Vec<CategoryStat>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct CategoryStat {
    pub category: String,
    pub kind: crate::database::models::TxnKind,
    pub total: Decimal,
}

#[derive(FromRow)]
struct Totals {
    total: Option<Decimal>,
    count: i64,
}

pub async fn affiliate_stats(pool: &PgPool, user_id: Uuid) -> Result<AffiliateStats, sqlx::Error> {
    let sales = sqlx::query_as::<_, Totals>(
        "SELECT COALESCE(SUM(amount), 0) AS total, COUNT(*) AS count FROM sales WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let expenses = sqlx::query_as::<_, Totals>(
        "SELECT COALESCE(SUM(amount), 0) AS total, COUNT(*) AS count FROM expenses WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let by_platform = sqlx::query_as::<_, PlatformStat>(
        "SELECT platform, COALESCE(SUM(amount), 0) AS total, COUNT(*) AS count
         FROM sales WHERE user_id = $1
         GROUP BY platform
         ORDER BY total DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let total_sales = sales.total.unwrap_or(Decimal::ZERO);
    let total_expenses = expenses.total.unwrap_or(Decimal::ZERO);

    Ok(AffiliateStats {
        total_sales,
        total_expenses,
        profit: total_sales - total_expenses,
        sales_count: sales.count,
        by_platform,
    })
}

pub async fn finance_stats(pool: &PgPool, user_id: Uuid) -> Result<FinanceStats, sqlx::Error> {
    let income = sqlx::query_as::<_, Totals>(
        "SELECT COALESCE(SUM(amount), 0) AS total, COUNT(*) AS count
         FROM transactions WHERE user_id = $1 AND kind = 'income'",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let expenses = sqlx::query_as::<_, Totals>(
        "SELECT COALESCE(SUM(amount), 0) AS total, COUNT(*) AS count
         FROM transactions WHERE user_id = $1 AND kind = 'expense'",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let by_category = sqlx::query_as::<_, CategoryStat>(
        "SELECT c.name AS category, c.kind AS kind, COALESCE(SUM(t.amount), 0) AS total
         FROM transactions t
         JOIN categories c ON c.id = t.category_id
         WHERE t.user_id = $1
         GROUP BY c.name, c.kind
         ORDER BY total DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let total_income = income.total.unwrap_or(Decimal::ZERO);
    let total_expenses = expenses.total.unwrap_or(Decimal::ZERO);

    Ok(FinanceStats {
        total_income,
        total_expenses,
        net: total_income - total_expenses,
        by_category,
    })
}
