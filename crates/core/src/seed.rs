//! Startup registration of the built-in `User` and `Order` schemas.

use crate::config::DEFAULT_REQUESTED_BY;
use crate::error::CoreError;
use crate::records::{ORDER_TYPE_NAME, USER_TYPE_NAME};
use crate::registry::SchemaRegistry;
use crate::schema::{CreateSchemaDefinition, SchemaKind};
use crate::strategy::StrategyTable;

pub const USER_SEED_RULES: &str = "\
- Age must be between 18 and 65
- Email format: firstname.lastname@domain.com
- Phone numbers should be in US format
- Use realistic US addresses
- Company names should be from Fortune 500 or well-known startups
- Occupations should match the company industry";

pub const ORDER_SEED_RULES: &str = "\
- Order IDs should be in format: ORD-YYYYMMDD-XXXX
- Order dates should be within the past 30 days
- Each order should have 1-5 items
- Product names should be realistic e-commerce items
- Total amount must equal sum of all item totals
- Unit prices should be reasonable (between $5 and $500)
- Use realistic payment methods: Credit Card, PayPal, Apple Pay, etc.";

/// Definitions registered at startup, one per built-in named type.
///
/// Each stored definition is the type's JSON-schema format descriptor.
pub fn default_schemas(strategies: &StrategyTable) -> Vec<CreateSchemaDefinition> {
    [
        (
            USER_TYPE_NAME,
            "User entity with personal and contact information",
            USER_SEED_RULES,
        ),
        (
            ORDER_TYPE_NAME,
            "E-commerce order with line items",
            ORDER_SEED_RULES,
        ),
    ]
    .into_iter()
    .filter_map(|(name, description, rules)| {
        let strategy = strategies.lookup(name)?;
        let mut input =
            CreateSchemaDefinition::new(name, SchemaKind::NamedType, strategy.format_descriptor());
        input.description = Some(description.to_string());
        input.business_rules = Some(rules.to_string());
        input.created_by = Some(DEFAULT_REQUESTED_BY.to_string());
        Some(input)
    })
    .collect()
}

/// Register the default schemas, skipping any that already exist.
///
/// Returns the number of schemas newly registered.
pub async fn seed_default_schemas(
    registry: &SchemaRegistry,
    strategies: &StrategyTable,
) -> Result<usize, CoreError> {
    let mut registered = 0;
    for input in default_schemas(strategies) {
        let name = input.name.clone();
        match registry.register(input).await {
            Ok(_) => registered += 1,
            Err(CoreError::AlreadyExists(_)) => {
                tracing::info!(schema_name = %name, "Default schema already exists, skipping");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(registered)
}
