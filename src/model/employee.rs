use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "name": "Jana Novak",
        "remaining_days": 20
    })
)]
pub struct EmployeeBalance {
    #[schema(example = 7)]
    pub id: i64,

    #[schema(example = "Jana Novak")]
    pub name: String,

    /// Never negative; changed only through ledger deltas.
    #[schema(example = 20)]
    pub remaining_days: i64,
}
