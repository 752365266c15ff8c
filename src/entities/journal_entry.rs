use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    entities::{
        Entity, EntityKind,
        reference::{
            AccountRef, ClassRef, CurrencyRef, DepartmentRef, EntityRef, JournalCodeRef, MetaData,
            TaxCodeRef, TaxRateRef,
        },
    },
    utils::{date_format::qbo_date_option, serde_helpers::empty_string_as_none},
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PostingType {
    Debit,
    Credit,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaxApplicableOn {
    Sales,
    Purchase,
}

/// The kind of party a journal line is attributed to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntityType {
    Customer,
    Vendor,
    Employee,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityAssignment {
    #[serde(rename = "Type")]
    pub entity_type: EntityType,
    pub entity_ref: EntityRef,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JournalEntryLineDetail {
    pub posting_type: PostingType,
    pub account_ref: AccountRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_ref: Option<ClassRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_ref: Option<DepartmentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_code_ref: Option<TaxCodeRef>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_applicable_on: Option<TaxApplicableOn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_code_ref: Option<JournalCodeRef>,
}

impl JournalEntryLineDetail {
    #[must_use]
    pub fn new(posting_type: PostingType, account_ref: impl Into<AccountRef>) -> Self {
        Self {
            posting_type,
            account_ref: account_ref.into(),
            class_ref: None,
            department_ref: None,
            tax_code_ref: None,
            tax_applicable_on: None,
            tax_amount: None,
            entity: None,
            journal_code_ref: None,
        }
    }
}

/// Values of a line's `DetailType` discriminator
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DetailType {
    JournalEntryLineDetail,
}

/// The detail object of a line. The variant determines both the
/// `DetailType` value and the key the detail is stored under.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LineDetailRepr", into = "LineDetailRepr")]
pub enum LineDetail {
    JournalEntry(JournalEntryLineDetail),
}

impl LineDetail {
    #[must_use]
    pub fn detail_type(&self) -> DetailType {
        match self {
            Self::JournalEntry(_) => DetailType::JournalEntryLineDetail,
        }
    }
}

/// Wire form of [`LineDetail`]: the discriminator next to one keyed detail object.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineDetailRepr {
    #[serde(rename = "DetailType")]
    detail_type: DetailType,
    #[serde(
        rename = "JournalEntryLineDetail",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    journal_entry_line_detail: Option<JournalEntryLineDetail>,
}

impl TryFrom<LineDetailRepr> for LineDetail {
    type Error = String;

    fn try_from(repr: LineDetailRepr) -> Result<Self, Self::Error> {
        match repr.detail_type {
            DetailType::JournalEntryLineDetail => repr
                .journal_entry_line_detail
                .map(Self::JournalEntry)
                .ok_or_else(|| {
                    "DetailType JournalEntryLineDetail without a JournalEntryLineDetail object"
                        .to_string()
                }),
        }
    }
}

impl From<LineDetail> for LineDetailRepr {
    fn from(detail: LineDetail) -> Self {
        let detail_type = detail.detail_type();
        match detail {
            LineDetail::JournalEntry(d) => Self {
                detail_type,
                journal_entry_line_detail: Some(d),
            },
        }
    }
}

/// A single posting of a journal entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Line {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_num: Option<u32>,
    #[serde(flatten)]
    pub detail: LineDetail,
}

impl Line {
    #[must_use]
    pub fn new(amount: Decimal, detail: JournalEntryLineDetail) -> Self {
        Self {
            id: None,
            description: None,
            amount,
            line_num: None,
            detail: LineDetail::JournalEntry(detail),
        }
    }

    #[must_use]
    pub fn debit(amount: Decimal, account_ref: impl Into<AccountRef>) -> Self {
        Self::new(
            amount,
            JournalEntryLineDetail::new(PostingType::Debit, account_ref),
        )
    }

    #[must_use]
    pub fn credit(amount: Decimal, account_ref: impl Into<AccountRef>) -> Self {
        Self::new(
            amount,
            JournalEntryLineDetail::new(PostingType::Credit, account_ref),
        )
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_line_num(mut self, line_num: u32) -> Self {
        self.line_num = Some(line_num);
        self
    }

    #[must_use]
    pub fn posting_type(&self) -> PostingType {
        match &self.detail {
            LineDetail::JournalEntry(d) => d.posting_type,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxLineDetail {
    pub tax_rate_ref: TaxRateRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_based: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_percent: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_amount_taxable: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_line_detail: Option<TaxLineDetail>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxnTaxDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txn_tax_code_ref: Option<TaxCodeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tax: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tax_line: Vec<TaxLine>,
}

/// A journal entry: a balanced set of debit and credit postings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JournalEntry {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_token: Option<String>,

    #[serde(rename = "Line", default)]
    pub lines: Vec<Line>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_number: Option<String>,

    #[serde(default, with = "qbo_date_option", skip_serializing_if = "Option::is_none")]
    pub txn_date: Option<Date>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_note: Option<String>,

    /// Whether this is an adjusting entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_ref: Option<CurrencyRef>,

    /// Units of home currency per unit of `currency_ref`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txn_tax_detail: Option<TxnTaxDetail>,

    /// Computed by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amt: Option<Decimal>,

    /// Computed by the service in home currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_total_amt: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<MetaData>,

    #[serde(rename = "domain", default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(rename = "sparse", default, skip_serializing_if = "Option::is_none")]
    pub sparse: Option<bool>,
}

impl JournalEntry {
    #[must_use]
    pub fn new(lines: Vec<Line>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_doc_number(mut self, doc_number: impl Into<String>) -> Self {
        self.doc_number = Some(doc_number.into());
        self
    }

    #[must_use]
    pub fn with_txn_date(mut self, txn_date: Date) -> Self {
        self.txn_date = Some(txn_date);
        self
    }

    #[must_use]
    pub fn with_private_note(mut self, note: impl Into<String>) -> Self {
        self.private_note = Some(note.into());
        self
    }

    #[must_use]
    pub fn with_adjustment(mut self, adjustment: bool) -> Self {
        self.adjustment = Some(adjustment);
        self
    }

    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<CurrencyRef>, exchange_rate: Option<Decimal>) -> Self {
        self.currency_ref = Some(currency.into());
        self.exchange_rate = exchange_rate;
        self
    }

    fn total_for(&self, posting_type: PostingType) -> Decimal {
        self.lines
            .iter()
            .filter(|line| line.posting_type() == posting_type)
            .map(|line| line.amount)
            .sum()
    }

    #[must_use]
    pub fn total_debits(&self) -> Decimal {
        self.total_for(PostingType::Debit)
    }

    #[must_use]
    pub fn total_credits(&self) -> Decimal {
        self.total_for(PostingType::Credit)
    }

    /// QuickBooks rejects entries whose debits and credits differ
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }
}

impl Entity for JournalEntry {
    const KIND: EntityKind = EntityKind::JOURNAL_ENTRY;
    const SERVER_ASSIGNED: &'static [&'static str] = &[
        "Id",
        "SyncToken",
        "MetaData",
        "domain",
        "sparse",
        "TotalAmt",
        "HomeTotalAmt",
    ];
    const SERVER_ASSIGNED_NESTED: &'static [(&'static str, &'static str)] = &[("Line", "Id")];

    fn has_required_fields(&self) -> bool {
        !self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;
    use time::macros::date;

    use super::*;

    fn sample_entry() -> JournalEntry {
        JournalEntry::new(vec![
            Line::debit(dec!(100.00), AccountRef::new("39").with_name("Opening Bal Equity"))
                .with_description("nov portion of rider insurance"),
            Line::credit(dec!(100.00), "44"),
        ])
        .with_txn_date(date!(2024 - 01 - 01))
    }

    #[test]
    fn line_serializes_discriminator_and_detail() {
        let value = serde_json::to_value(&sample_entry()).unwrap();
        assert_eq!(
            value,
            json!({
                "TxnDate": "2024-01-01",
                "Line": [
                    {
                        "Description": "nov portion of rider insurance",
                        "Amount": 100.0,
                        "DetailType": "JournalEntryLineDetail",
                        "JournalEntryLineDetail": {
                            "PostingType": "Debit",
                            "AccountRef": {"value": "39", "name": "Opening Bal Equity"}
                        }
                    },
                    {
                        "Amount": 100.0,
                        "DetailType": "JournalEntryLineDetail",
                        "JournalEntryLineDetail": {
                            "PostingType": "Credit",
                            "AccountRef": {"value": "44"}
                        }
                    }
                ]
            })
        );
    }

    #[test]
    fn decodes_created_entry() {
        let entry: JournalEntry = serde_json::from_value(json!({
            "SyncToken": "0",
            "domain": "QBO",
            "TxnDate": "2015-06-29",
            "TotalAmt": 0,
            "sparse": false,
            "Line": [
                {
                    "JournalEntryLineDetail": {
                        "PostingType": "Debit",
                        "AccountRef": {"name": "Opening Bal Equity", "value": "39"},
                        "TaxApplicableOn": ""
                    },
                    "DetailType": "JournalEntryLineDetail",
                    "Amount": 100.0,
                    "Id": "0",
                    "Description": "nov portion of rider insurance"
                },
                {
                    "JournalEntryLineDetail": {
                        "PostingType": "Credit",
                        "AccountRef": {"name": "Notes Payable", "value": "44"}
                    },
                    "DetailType": "JournalEntryLineDetail",
                    "Amount": 100.0,
                    "Id": "1",
                    "Description": "nov portion of rider insurance"
                }
            ],
            "Adjustment": false,
            "Id": "227",
            "TxnTaxDetail": {},
            "MetaData": {
                "CreateTime": "2015-06-29T12:33:57-07:00",
                "LastUpdatedTime": "2015-06-29T12:33:57-07:00"
            }
        }))
        .unwrap();

        assert_eq!(entry.id.as_deref(), Some("227"));
        assert_eq!(entry.txn_date, Some(date!(2015 - 06 - 29)));
        assert_eq!(entry.lines.len(), 2);
        assert_eq!(entry.lines[1].posting_type(), PostingType::Credit);
        assert!(entry.is_balanced());
        assert!(entry.has_required_fields());
        assert_eq!(entry.txn_tax_detail, Some(TxnTaxDetail::default()));
    }

    #[test]
    fn discriminator_without_detail_is_rejected() {
        let result: Result<Line, _> = serde_json::from_value(json!({
            "Amount": 10,
            "DetailType": "JournalEntryLineDetail"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_detail_type_is_rejected() {
        let result: Result<Line, _> = serde_json::from_value(json!({
            "Amount": 10,
            "DetailType": "SalesItemLineDetail",
            "SalesItemLineDetail": {}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn balance_tracks_postings() {
        let entry = sample_entry().with_line(Line::debit(dec!(0.01), "39"));
        assert_eq!(entry.total_debits(), dec!(100.01));
        assert_eq!(entry.total_credits(), dec!(100.00));
        assert!(!entry.is_balanced());
    }
}
