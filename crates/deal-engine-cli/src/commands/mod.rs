pub mod amortize;
pub mod brrrr;
pub mod fix_flip;
pub mod hold;
pub mod scenarios;
pub mod underwrite;

use deal_engine_core::FinancingType;

/// Map a CLI financing string onto the core enum.
pub fn parse_financing(value: &str) -> Result<FinancingType, Box<dyn std::error::Error>> {
    match value.to_ascii_lowercase().as_str() {
        "conventional" => Ok(FinancingType::Conventional),
        "hard-money" | "hardmoney" => Ok(FinancingType::HardMoney),
        "private-loc" | "privateloc" => Ok(FinancingType::PrivateLoc),
        "subject-to" | "subjectto" => Ok(FinancingType::SubjectTo),
        "hybrid" => Ok(FinancingType::Hybrid),
        "cash" => Ok(FinancingType::Cash),
        other => Err(format!(
            "Unknown financing type '{other}' (expected conventional, hard-money, \
             private-loc, subject-to, hybrid, or cash)"
        )
        .into()),
    }
}
