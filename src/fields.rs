//! The certificate's field record and how edits turn into replacements.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;
use crate::substitute::Replacement;

const PURPOSE_SUFFIX: &str = " 제출";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Applicant,
    Ssn,
    Address,
    ServicePeriod,
    ServiceContent,
    Purpose,
    CompanyName,
    BusinessNo,
    CompanyAddress,
    Representative,
    IssueDate,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Applicant,
        Field::Ssn,
        Field::Address,
        Field::ServicePeriod,
        Field::ServiceContent,
        Field::Purpose,
        Field::CompanyName,
        Field::BusinessNo,
        Field::CompanyAddress,
        Field::Representative,
        Field::IssueDate,
    ];

    /// Fields a user may change, in the order their replacements are applied.
    pub const EDITABLE: [Field; 7] = [
        Field::Applicant,
        Field::Ssn,
        Field::Address,
        Field::ServicePeriod,
        Field::ServiceContent,
        Field::Purpose,
        Field::IssueDate,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::Applicant => "applicant",
            Field::Ssn => "ssn",
            Field::Address => "address",
            Field::ServicePeriod => "servicePeriod",
            Field::ServiceContent => "serviceContent",
            Field::Purpose => "purpose",
            Field::CompanyName => "companyName",
            Field::BusinessNo => "businessNo",
            Field::CompanyAddress => "companyAddress",
            Field::Representative => "representative",
            Field::IssueDate => "issueDate",
        }
    }

    pub fn is_editable(self) -> bool {
        Field::EDITABLE.contains(&self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields {
    pub applicant: String,
    pub ssn: String,
    pub address: String,
    pub service_period: String,
    pub service_content: String,
    pub purpose: String,
    pub company_name: String,
    pub business_no: String,
    pub company_address: String,
    pub representative: String,
    pub issue_date: String,
}

impl Fields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Applicant => &self.applicant,
            Field::Ssn => &self.ssn,
            Field::Address => &self.address,
            Field::ServicePeriod => &self.service_period,
            Field::ServiceContent => &self.service_content,
            Field::Purpose => &self.purpose,
            Field::CompanyName => &self.company_name,
            Field::BusinessNo => &self.business_no,
            Field::CompanyAddress => &self.company_address,
            Field::Representative => &self.representative,
            Field::IssueDate => &self.issue_date,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Applicant => &mut self.applicant,
            Field::Ssn => &mut self.ssn,
            Field::Address => &mut self.address,
            Field::ServicePeriod => &mut self.service_period,
            Field::ServiceContent => &mut self.service_content,
            Field::Purpose => &mut self.purpose,
            Field::CompanyName => &mut self.company_name,
            Field::BusinessNo => &mut self.business_no,
            Field::CompanyAddress => &mut self.company_address,
            Field::Representative => &mut self.representative,
            Field::IssueDate => &mut self.issue_date,
        }
    }

    /// Applies a user edit. Resident numbers are reformatted as `######-#######`.
    pub fn edit(&mut self, field: Field, value: &str) {
        *self.get_mut(field) = match field {
            Field::Ssn => normalize_ssn(value),
            _ => value.to_string(),
        };
    }

    /// The record as it should be written: a blank issue date becomes
    /// `today`, and the purpose names the submission.
    pub fn finalized(&self, today: &str) -> Fields {
        let mut fields = self.clone();
        if fields.issue_date.trim().is_empty() {
            fields.issue_date = today.to_string();
        }
        if !fields.purpose.is_empty() && !fields.purpose.ends_with(PURPOSE_SUFFIX.trim_start()) {
            fields.purpose.push_str(PURPOSE_SUFFIX);
        }
        fields
    }
}

/// Ordered replacements turning `original` text into `edited` text. Blank
/// or unchanged values produce nothing.
pub fn replacements(original: &Fields, edited: &Fields) -> Vec<Replacement> {
    Field::EDITABLE
        .into_iter()
        .filter_map(|field| {
            let old = original.get(field);
            let new = edited.get(field);
            (!old.is_empty() && !new.is_empty() && old != new)
                .then(|| Replacement::new(field.key(), old, new))
        })
        .collect()
}

pub fn normalize_ssn(value: &str) -> String {
    let digits: String = value.chars().filter(char::is_ascii_digit).take(13).collect();
    if digits.len() <= 6 {
        return digits;
    }
    format!("{}-{}", &digits[..6], &digits[6..])
}

/// Today's date in Korea (UTC+9), as `YYYY년 MM월 DD일`.
pub fn today_kst() -> String {
    let now = chrono::Utc::now() + chrono::Duration::hours(9);
    now.format("%Y년 %m월 %d일").to_string()
}

static TAB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<hp:tab[^>]*/>").expect("invalid regex"));
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("invalid regex"));
static SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("invalid regex"));
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}년\s*\d{1,2}월\s*\d{1,2}일").expect("invalid regex"));

static LABELLED: LazyLock<Vec<(Field, Regex)>> = LazyLock::new(|| {
    [
        (Field::Applicant, r"신\s*청\s*인\s*[:;]\s*([^주]+)"),
        (Field::Ssn, r"주\s*민\s*등\s*록\s*번\s*호\s*[:;]\s*([^주]+)"),
        (Field::Address, r"주\s*소\s*지\s*[:;]\s*([^용]+)"),
        (Field::ServicePeriod, r"용\s*역\s*기\s*간\s*[:;]\s*([^용]+)"),
        (Field::ServiceContent, r"용\s*역\s*내\s*용\s*[:;]\s*([^용]+)"),
        (Field::Purpose, r"용\s*도\s*[:;]\s*([^위]+)"),
        (Field::CompanyName, r"업\s*체\s*명\s*[:;]\s*([^사]+)"),
        (Field::BusinessNo, r"사\s*업\s*자\s*등\s*록\s*번\s*호\s*[:;]\s*([^주]+)"),
        (Field::CompanyAddress, r"주\s*소\s*[:;]\s*([^대]+)"),
        (Field::Representative, r"대\s*표\s*자\s*[:;]\s*([^()]+)"),
    ]
    .into_iter()
    .map(|(field, pattern)| (field, Regex::new(pattern).expect("invalid regex")))
    .collect()
});

/// Pattern-based field extraction from raw section XML, used when no
/// recognition service is available. Labels may be spaced out
/// (`신 청 인 :`); each value runs until the next label's first syllable.
pub fn extract_local(xml: &str) -> Fields {
    let text = TAB.replace_all(xml, " ");
    let text = TAG.replace_all(&text, "");
    let text = text.replace("&nbsp;", " ");
    let text = SPACES.replace_all(&text, " ");

    let mut fields = Fields::default();
    for (field, pattern) in LABELLED.iter() {
        if let Some(value) = pattern.captures(&text).and_then(|c| c.get(1)) {
            *fields.get_mut(*field) = clean(value.as_str());
        }
    }
    if let Some(date) = DATE.find_iter(&text).last() {
        fields.issue_date = clean(date.as_str());
    }
    let found: Vec<&str> = Field::ALL
        .into_iter()
        .filter(|field| !fields.get(*field).is_empty())
        .map(Field::key)
        .collect();
    log::debug!("extracted fields locally: {}", found.join(", "));
    fields
}

fn clean(value: &str) -> String {
    value.replace([':', ';'], "").trim().to_string()
}
