use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// What kind of property is being underwritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    #[default]
    SingleFamily,
    MultiFamily,
    ShortTermRental,
    OfficeRetail,
    Land,
    Hotel,
}

/// The operating strategy for the deal. Drives income-model dispatch
/// and the cash-invested basis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    #[default]
    BuyAndHold,
    ShortTermRental,
    RentalArbitrage,
    FixAndFlip,
    Brrrr,
}

/// How the acquisition is financed. `Cash` means no new loan: loan
/// amount, payment, and schedule are all zero/empty regardless of any
/// `LoanSpec` supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinancingType {
    #[default]
    Conventional,
    HardMoney,
    PrivateLoc,
    SubjectTo,
    Hybrid,
    Cash,
}

/// A new loan originated at acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSpec {
    pub principal: Money,
    /// Annual note rate as a fraction (0.065 = 6.5%)
    pub annual_rate: Rate,
    pub term_months: u32,
    #[serde(default)]
    pub interest_only: bool,
    /// Interest-only months before the loan re-amortizes (hybrid loans)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub io_period_months: Option<u32>,
}

/// An existing note being assumed mid-term (Subject-To purchase).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectToLoan {
    pub original_principal: Money,
    pub annual_rate: Rate,
    pub original_term_months: u32,
    /// Payment as stated by the seller; replaced by the recomputed
    /// scheduled payment when off by more than one cent
    pub stated_payment: Money,
    pub payments_made: u32,
    /// Cash paid to the seller at assumption (part of cash invested)
    #[serde(default)]
    pub seller_payment: Money,
}

/// Fixed monthly dollar costs plus percentage-of-income rates.
///
/// Rates are intentionally not clamped: a combined rate above 100%
/// produces negative NOI, which signals an unviable deal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatingExpenseSpec {
    #[serde(default)]
    pub property_tax: Money,
    #[serde(default)]
    pub insurance: Money,
    #[serde(default)]
    pub utilities: Money,
    #[serde(default)]
    pub hoa: Money,
    #[serde(default)]
    pub other_fixed: Money,
    #[serde(default)]
    pub maintenance_rate: Rate,
    #[serde(default)]
    pub vacancy_rate: Rate,
    #[serde(default)]
    pub management_rate: Rate,
    #[serde(default)]
    pub cap_ex_rate: Rate,
    #[serde(default)]
    pub op_ex_rate: Rate,
}

impl OperatingExpenseSpec {
    pub fn fixed_monthly(&self) -> Money {
        self.property_tax + self.insurance + self.utilities + self.hoa + self.other_fixed
    }

    pub fn percentage_total(&self) -> Rate {
        self.maintenance_rate
            + self.vacancy_rate
            + self.management_rate
            + self.cap_ex_rate
            + self.op_ex_rate
    }
}

/// Channel-mix detail for the enhanced short-term-rental model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMixModel {
    /// Share of bookings per channel (fractions, should sum to 1)
    pub airbnb_share: Rate,
    pub vrbo_share: Rate,
    pub direct_share: Rate,
    /// Commission charged by each paid channel (direct bookings are free)
    pub airbnb_commission: Rate,
    pub vrbo_commission: Rate,
    /// Weekend rate premium (0.2 = weekend nights book 20% above base)
    #[serde(default)]
    pub weekend_premium: Rate,
    /// Share of occupied nights that are weekend nights
    #[serde(default)]
    pub weekend_share: Rate,
    /// Bookable nights lost to turnovers each month
    #[serde(default)]
    pub turnover_days_per_month: Decimal,
}

/// Nightly revenue model for STR and rental-arbitrage operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightlyModel {
    pub nightly_rate: Money,
    pub occupied_nights_per_month: Decimal,
    /// Cleaning/pet/other fees collected per month
    #[serde(default)]
    pub monthly_fees: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced: Option<ChannelMixModel>,
}

/// Per-square-foot model for office/retail property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommercialModel {
    pub square_feet: Decimal,
    pub annual_rent_per_sq_ft: Money,
    /// Leased fraction (0.9 = 90% occupied)
    pub occupancy: Rate,
}

/// Room-revenue model for hotel property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelModel {
    pub rooms: u32,
    pub average_daily_rate: Money,
    pub occupancy: Rate,
}

/// Quarterly occupancy multipliers, with optional per-quarter ADR detail.
///
/// When the ADR set is complete and non-zero the engine applies the
/// single-month path (the multiplier for the quarter containing
/// `analysis_month`); otherwise it averages the four multipliers. The
/// two paths are not equivalent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalInputs {
    pub quarterly_occupancy: [Rate; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarterly_adr: Option<[Money; 4]>,
    /// Calendar month (1-12) the analysis is anchored to
    #[serde(default = "default_analysis_month")]
    pub analysis_month: u32,
}

fn default_analysis_month() -> u32 {
    1
}

/// The superset of income fields the consuming UI collects. Which
/// model is active is a pure dispatch on `(PropertyType, OperationType)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeInputs {
    #[serde(default)]
    pub monthly_rent: Money,
    #[serde(default)]
    pub unit_rents: Vec<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nightly: Option<NightlyModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commercial: Option<CommercialModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel: Option<HotelModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_monthly_income: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal: Option<SeasonalInputs>,
}

/// Startup costs specific to a rental-arbitrage deal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArbitrageStartup {
    #[serde(default)]
    pub deposit: Money,
    #[serde(default)]
    pub repair_estimate: Money,
    #[serde(default)]
    pub furniture: Money,
    #[serde(default)]
    pub other: Money,
}

/// How operating reserves are funded at acquisition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ReservePolicy {
    #[default]
    None,
    FixedAmount(Money),
    /// N months of total monthly operating cost (expenses + debt service)
    MonthsOfCosts(Decimal),
}

/// Cash outlays at acquisition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcquisitionCosts {
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default)]
    pub closing_costs: Money,
    #[serde(default)]
    pub rehab_cost: Money,
    #[serde(default)]
    pub furniture_cost: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arbitrage: Option<ArbitrageStartup>,
    #[serde(default)]
    pub reserves: ReservePolicy,
}

/// Fix & Flip strategy inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixFlipInputs {
    /// After-repair value
    pub arv: Money,
    /// Target purchase fraction of ARV (0.70 = the 70% rule)
    pub target_rate: Rate,
    pub rehab_cost: Money,
    pub holding_cost_monthly: Money,
    pub holding_months: u32,
    /// Agent/transfer costs at resale as a fraction of ARV
    pub selling_cost_rate: Rate,
    /// Amount borrowed for the flip (hard money / private LOC)
    #[serde(default)]
    pub loan_amount: Money,
    #[serde(default)]
    pub annual_rate: Rate,
}

/// BRRRR refinance inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrrrrInputs {
    /// After-repair value at refinance
    pub arv: Money,
    /// Refinance loan-to-value (0.75 = 75%)
    pub refinance_ltv: Rate,
    pub refinance_rate: Rate,
    pub refinance_term_months: u32,
    /// Overrides the engine-computed cash invested when supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_cash_invested: Option<Money>,
}

/// Long-hold projection inputs. Income and expense growth are
/// deliberately independent; appreciation is a third, separate rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldProjectionInputs {
    pub hold_years: u32,
    pub income_growth: Rate,
    pub expense_growth: Rate,
    pub appreciation_rate: Rate,
    pub selling_cost_rate: Rate,
}

/// 1031 exchange inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange1031Inputs {
    pub relinquished_value: Money,
    pub adjusted_basis: Money,
    pub relinquished_debt: Money,
    pub replacement_value: Money,
    pub replacement_debt: Money,
    #[serde(default)]
    pub accumulated_depreciation: Money,
    /// Long-term capital gains rate applied to the non-recapture portion
    pub capital_gains_rate: Rate,
    pub closing_date: NaiveDate,
}

/// Category of an irregular capital expenditure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapitalEventCategory {
    Roof,
    Hvac,
    Plumbing,
    Electrical,
    Structural,
    Exterior,
    Other,
}

/// A probability-weighted irregular cost injected into a projection year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalEvent {
    /// Projection year the cost lands in (1-based)
    pub year: u32,
    pub description: String,
    pub category: CapitalEventCategory,
    pub estimated_cost: Money,
    /// Chance of occurrence, 0-100
    pub likelihood: Decimal,
}

/// Confidence level for the parametric uncertainty model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Eighty,
    Ninety,
    #[default]
    NinetyFive,
}

/// Independent uncertainty fractions for income and expenses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UncertaintyInputs {
    pub income_uncertainty: Rate,
    pub expense_uncertainty: Rate,
    #[serde(default)]
    pub confidence_level: ConfidenceLevel,
}

/// Output shape for any metric run through the uncertainty model.
/// Bounds are symmetric and parametric, never resampled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricWithConfidence {
    pub low: Decimal,
    pub base: Decimal,
    pub high: Decimal,
    pub standard_deviation: Decimal,
    pub confidence_level: ConfidenceLevel,
}

/// The aggregate input to every metric function. A pure value record:
/// constructed from UI state, consumed, discarded. No engine function
/// mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealState {
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub operation_type: OperationType,
    #[serde(default)]
    pub financing_type: FinancingType,
    pub purchase_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan: Option<LoanSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_to: Option<SubjectToLoan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hybrid_second: Option<LoanSpec>,
    #[serde(default)]
    pub income: IncomeInputs,
    #[serde(default)]
    pub expenses: OperatingExpenseSpec,
    #[serde(default)]
    pub acquisition: AcquisitionCosts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_flip: Option<FixFlipInputs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brrrr: Option<BrrrrInputs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold: Option<HoldProjectionInputs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_1031: Option<Exchange1031Inputs>,
    #[serde(default)]
    pub capital_events: Vec<CapitalEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<UncertaintyInputs>,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
