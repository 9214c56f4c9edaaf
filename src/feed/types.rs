use serde::{Deserialize, Serialize};

/// A single job listing as returned by the listing endpoint.
///
/// Field names follow the upstream JSON (`minExp`, `companyName`, ...). Numeric
/// fields the upstream sometimes sends as `null` are optional.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(default)]
    pub jd_uid: Option<String>,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub min_exp: Option<f64>,
    #[serde(default)]
    pub max_exp: Option<f64>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tech_stack: String,
    #[serde(default)]
    pub job_role: String,
    #[serde(default)]
    pub min_jd_salary: Option<f64>,
    #[serde(default)]
    pub max_jd_salary: Option<f64>,
    #[serde(default)]
    pub salary_currency_code: Option<String>,
    #[serde(default)]
    pub jd_link: Option<String>,
    #[serde(default)]
    pub job_details_from_company: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl JobPosting {
    /// Minimal posting with the fields the filter looks at. Everything else is unset.
    pub fn new(company_name: &str, location: &str, tech_stack: &str, job_role: &str) -> Self {
        Self {
            jd_uid: None,
            company_name: company_name.to_string(),
            min_exp: None,
            max_exp: None,
            location: location.to_string(),
            tech_stack: tech_stack.to_string(),
            job_role: job_role.to_string(),
            min_jd_salary: None,
            max_jd_salary: None,
            salary_currency_code: None,
            jd_link: None,
            job_details_from_company: None,
            logo_url: None,
        }
    }

    pub fn with_min_exp(mut self, years: f64) -> Self {
        self.min_exp = Some(years);
        self
    }

    pub fn with_min_salary(mut self, salary: f64) -> Self {
        self.min_jd_salary = Some(salary);
        self
    }

    /// Stable identifier: the upstream `jdUid` when present, else the
    /// position of the posting in the accumulated feed.
    pub fn identifier(&self, position: usize) -> String {
        match &self.jd_uid {
            Some(uid) if !uid.is_empty() => uid.clone(),
            _ => position.to_string(),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.location.to_lowercase().contains("remote")
    }
}

/// Outbound request body for one page of the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u64,
}

/// Listing endpoint response. `jdList` is required; a body without it is a decode failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdListResponse {
    pub jd_list: Vec<JobPosting>,
    #[serde(default)]
    pub total_count: Option<u64>,
}
