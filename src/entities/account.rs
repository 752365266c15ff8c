use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{
        Entity, EntityKind,
        reference::{CurrencyRef, MetaData, ParentRef},
    },
    utils::serde_helpers::empty_string_as_none,
};

/// Account types in QuickBooks
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccountType {
    Bank,
    #[serde(rename = "Other Current Asset")]
    OtherCurrentAsset,
    #[serde(rename = "Fixed Asset")]
    FixedAsset,
    #[serde(rename = "Other Asset")]
    OtherAsset,
    #[serde(rename = "Accounts Receivable")]
    AccountsReceivable,
    Equity,
    Expense,
    #[serde(rename = "Other Expense")]
    OtherExpense,
    #[serde(rename = "Cost of Goods Sold")]
    CostOfGoodsSold,
    #[serde(rename = "Accounts Payable")]
    AccountsPayable,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Long Term Liability")]
    LongTermLiability,
    #[serde(rename = "Other Current Liability")]
    OtherCurrentLiability,
    Income,
    #[serde(rename = "Other Income")]
    OtherIncome,
}

impl AccountType {
    /// The classification QuickBooks derives from the account type
    #[must_use]
    pub fn classification(self) -> AccountClassification {
        match self {
            Self::Bank
            | Self::OtherCurrentAsset
            | Self::FixedAsset
            | Self::OtherAsset
            | Self::AccountsReceivable => AccountClassification::Asset,
            Self::Equity => AccountClassification::Equity,
            Self::Expense | Self::OtherExpense | Self::CostOfGoodsSold => {
                AccountClassification::Expense
            }
            Self::AccountsPayable
            | Self::CreditCard
            | Self::LongTermLiability
            | Self::OtherCurrentLiability => AccountClassification::Liability,
            Self::Income | Self::OtherIncome => AccountClassification::Revenue,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccountClassification {
    Asset,
    Equity,
    Expense,
    Liability,
    Revenue,
}

/// Represents an account in the chart of accounts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
    /// Server-assigned identifier
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Version number used for optimistic locking (server-assigned)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_token: Option<String>,

    /// User recognisable name, unique among accounts (max 100 chars)
    #[serde(default)]
    pub name: String,

    pub account_type: AccountType,

    /// Detailed account type, e.g. `CashOnHand` for a bank account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_sub_type: Option<String>,

    /// User-defined account number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acct_num: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_account: Option<bool>,

    /// Immediate parent account, required when `sub_account` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<ParentRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub classification: Option<AccountClassification>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_ref: Option<CurrencyRef>,

    /// Name including all parent accounts, `Parent:Child` (server-assigned)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fully_qualified_name: Option<String>,

    /// Balance of this account only (server-assigned)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_balance: Option<Decimal>,

    /// Balance including sub-accounts (server-assigned)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_balance_with_sub_accounts: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<MetaData>,

    #[serde(rename = "domain", default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(rename = "sparse", default, skip_serializing_if = "Option::is_none")]
    pub sparse: Option<bool>,
}

impl Account {
    /// Create a new account with the fields QuickBooks requires
    #[must_use]
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id: None,
            sync_token: None,
            name: name.into(),
            account_type,
            account_sub_type: None,
            acct_num: None,
            description: None,
            sub_account: None,
            parent_ref: None,
            active: None,
            classification: None,
            currency_ref: None,
            fully_qualified_name: None,
            current_balance: None,
            current_balance_with_sub_accounts: None,
            meta_data: None,
            domain: None,
            sparse: None,
        }
    }

    #[must_use]
    pub fn with_sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.account_sub_type = Some(sub_type.into());
        self
    }

    #[must_use]
    pub fn with_acct_num(mut self, acct_num: impl Into<String>) -> Self {
        self.acct_num = Some(acct_num.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Make this a sub-account of `parent`
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<ParentRef>) -> Self {
        self.sub_account = Some(true);
        self.parent_ref = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<CurrencyRef>) -> Self {
        self.currency_ref = Some(currency.into());
        self
    }
}

impl Entity for Account {
    const KIND: EntityKind = EntityKind::ACCOUNT;
    const SERVER_ASSIGNED: &'static [&'static str] = &[
        "Id",
        "SyncToken",
        "MetaData",
        "domain",
        "sparse",
        "FullyQualifiedName",
        "CurrentBalance",
        "CurrentBalanceWithSubAccounts",
    ];

    fn has_required_fields(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_with_quickbooks_names() {
        let account = Account::new("Petty Cash", AccountType::Bank)
            .with_sub_type("CashOnHand")
            .with_acct_num("1010")
            .with_currency("USD");

        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(
            value,
            json!({
                "Name": "Petty Cash",
                "AccountType": "Bank",
                "AccountSubType": "CashOnHand",
                "AcctNum": "1010",
                "CurrencyRef": {"value": "USD"},
            })
        );
    }

    #[test]
    fn multi_word_account_types_use_spaces() {
        let value = serde_json::to_value(AccountType::OtherCurrentLiability).unwrap();
        assert_eq!(value, json!("Other Current Liability"));
        let parsed: AccountType = serde_json::from_value(json!("Cost of Goods Sold")).unwrap();
        assert_eq!(parsed, AccountType::CostOfGoodsSold);
    }

    #[test]
    fn decodes_created_account() {
        let account: Account = serde_json::from_value(json!({
            "FullyQualifiedName": "MyJobs",
            "domain": "QBO",
            "Name": "MyJobs",
            "Classification": "Asset",
            "AccountSubType": "AccountsReceivable",
            "CurrencyRef": {"name": "United States Dollar", "value": "USD"},
            "CurrentBalanceWithSubAccounts": 0,
            "sparse": false,
            "MetaData": {
                "CreateTime": "2014-12-31T09:29:05-08:00",
                "LastUpdatedTime": "2014-12-31T09:29:05-08:00"
            },
            "AccountType": "Accounts Receivable",
            "CurrentBalance": 12.5,
            "Active": true,
            "SyncToken": "0",
            "Id": "94",
            "SubAccount": false
        }))
        .unwrap();

        assert_eq!(account.id.as_deref(), Some("94"));
        assert_eq!(account.account_type, AccountType::AccountsReceivable);
        assert_eq!(account.classification, Some(AccountClassification::Asset));
        assert_eq!(account.current_balance, Some(dec!(12.5)));
        assert_eq!(
            account.currency_ref.and_then(|c| c.name).as_deref(),
            Some("United States Dollar")
        );
        assert!(account.meta_data.and_then(|m| m.create_time).is_some());
    }

    #[test]
    fn blank_name_is_not_a_created_account() {
        let account: Account =
            serde_json::from_value(json!({"AccountType": "Bank", "Classification": ""})).unwrap();
        assert!(!account.has_required_fields());
        assert_eq!(account.classification, None);
    }

    #[test]
    fn classification_follows_type() {
        assert_eq!(
            AccountType::CreditCard.classification(),
            AccountClassification::Liability
        );
        assert_eq!(
            AccountType::OtherIncome.classification(),
            AccountClassification::Revenue
        );
    }
}
