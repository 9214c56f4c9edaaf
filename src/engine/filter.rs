use crate::feed::types::JobPosting;
use serde::Deserialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum LocationMode {
    #[serde(rename = "remote", alias = "Remote")]
    Remote,
    #[serde(rename = "on-site", alias = "On-site", alias = "onsite")]
    OnSite,
}

/// User-selected filter configuration. Always replaced wholesale, never merged.
///
/// Accepts both the snake_case config names and the camelCase names the
/// filter form sends (`minExp`, `companyName`, `remote`, ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CriteriaSet {
    #[serde(alias = "minExp")]
    pub min_exp: Option<f64>,
    #[serde(alias = "companyName")]
    pub company_name: Option<String>,
    #[serde(alias = "location_mode")]
    pub remote: BTreeSet<LocationMode>,
    #[serde(alias = "techStack")]
    pub tech_stack: BTreeSet<String>,
    #[serde(alias = "jobRole")]
    pub job_role: BTreeSet<String>,
    #[serde(alias = "minJdSalary")]
    pub min_jd_salary: Option<f64>,
}

impl CriteriaSet {
    /// True when no dimension restricts anything.
    pub fn is_empty(&self) -> bool {
        self.min_exp.is_none()
            && self.company_name.as_deref().is_none_or(str::is_empty)
            && self.remote.is_empty()
            && self.tech_stack.is_empty()
            && self.job_role.is_empty()
            && self.min_jd_salary.is_none()
    }

    /// Check a single posting against every clause. Short-circuits on the first failure.
    pub fn matches(&self, posting: &JobPosting) -> bool {
        if let (Some(min), Some(exp)) = (self.min_exp, posting.min_exp) {
            if exp < min {
                return false;
            }
        }

        if let Some(name) = self.company_name.as_deref().filter(|n| !n.is_empty()) {
            if !posting
                .company_name
                .to_lowercase()
                .contains(&name.to_lowercase())
            {
                return false;
            }
        }

        if !self.location_matches(posting) {
            return false;
        }

        if !self.tech_stack.is_empty() && !self.tech_stack.contains(&posting.tech_stack) {
            return false;
        }

        if !self.job_role.is_empty() && !self.job_role.contains(&posting.job_role) {
            return false;
        }

        if let (Some(min), Some(salary)) = (self.min_jd_salary, posting.min_jd_salary) {
            if salary < min {
                return false;
            }
        }

        true
    }

    fn location_matches(&self, posting: &JobPosting) -> bool {
        let remote = self.remote.contains(&LocationMode::Remote);
        let on_site = self.remote.contains(&LocationMode::OnSite);
        match (remote, on_site) {
            // Both selected is the same as no location filter.
            (true, true) | (false, false) => true,
            (true, false) => posting.is_remote(),
            (false, true) => !posting.is_remote(),
        }
    }
}

/// Stable filter: surviving postings keep their relative order and are
/// borrowed from `postings`, not copied.
pub fn filter<'a>(postings: &'a [JobPosting], criteria: &CriteriaSet) -> Vec<&'a JobPosting> {
    postings.iter().filter(|p| criteria.matches(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<JobPosting> {
        vec![
            JobPosting::new("Acme", "Remote", "rust", "backend")
                .with_min_exp(2.0)
                .with_min_salary(40.0),
            JobPosting::new("beta", "Bangalore", "react", "frontend")
                .with_min_exp(5.0)
                .with_min_salary(80.0),
            JobPosting::new("ACME Corp", "remote (US only)", "go", "backend"),
            JobPosting::new("Gamma", "Delhi NCR", "rust", "ios").with_min_exp(1.0),
        ]
    }

    fn companies(result: &[&JobPosting]) -> Vec<String> {
        result.iter().map(|p| p.company_name.clone()).collect()
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let postings = sample();
        let criteria = CriteriaSet::default();
        assert!(criteria.is_empty());
        let result = filter(&postings, &criteria);
        assert_eq!(result.len(), postings.len());
        for (kept, original) in result.iter().zip(&postings) {
            assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn test_min_exp_excludes_lower() {
        let postings = vec![
            JobPosting::new("A", "remote", "rust", "backend").with_min_exp(2.0),
            JobPosting::new("B", "remote", "rust", "backend").with_min_exp(5.0),
        ];
        let criteria = CriteriaSet {
            min_exp: Some(3.0),
            ..Default::default()
        };
        assert_eq!(companies(&filter(&postings, &criteria)), vec!["B"]);
    }

    #[test]
    fn test_min_exp_is_inclusive() {
        let postings = vec![JobPosting::new("A", "remote", "rust", "backend").with_min_exp(3.0)];
        let criteria = CriteriaSet {
            min_exp: Some(3.0),
            ..Default::default()
        };
        assert_eq!(filter(&postings, &criteria).len(), 1);
    }

    #[test]
    fn test_missing_numbers_do_not_disqualify() {
        let postings = vec![JobPosting::new("A", "remote", "rust", "backend")];
        let criteria = CriteriaSet {
            min_exp: Some(10.0),
            min_jd_salary: Some(500.0),
            ..Default::default()
        };
        assert_eq!(filter(&postings, &criteria).len(), 1);
    }

    #[test]
    fn test_company_name_case_insensitive_substring() {
        let postings = vec![
            JobPosting::new("Acme", "x", "rust", "backend"),
            JobPosting::new("beta", "x", "rust", "backend"),
            JobPosting::new("ACME Corp", "x", "rust", "backend"),
        ];
        let criteria = CriteriaSet {
            company_name: Some("acme".to_string()),
            ..Default::default()
        };
        assert_eq!(companies(&filter(&postings, &criteria)), vec!["Acme", "ACME Corp"]);
    }

    #[test]
    fn test_empty_company_name_is_permissive() {
        let postings = sample();
        let criteria = CriteriaSet {
            company_name: Some(String::new()),
            ..Default::default()
        };
        assert!(criteria.is_empty());
        assert_eq!(filter(&postings, &criteria).len(), postings.len());
    }

    #[test]
    fn test_remote_only() {
        let postings = sample();
        let criteria = CriteriaSet {
            remote: BTreeSet::from([LocationMode::Remote]),
            ..Default::default()
        };
        assert_eq!(companies(&filter(&postings, &criteria)), vec!["Acme", "ACME Corp"]);
    }

    #[test]
    fn test_on_site_only() {
        let postings = sample();
        let criteria = CriteriaSet {
            remote: BTreeSet::from([LocationMode::OnSite]),
            ..Default::default()
        };
        assert_eq!(companies(&filter(&postings, &criteria)), vec!["beta", "Gamma"]);
    }

    #[test]
    fn test_both_location_modes_equal_no_location_filter() {
        let postings = sample();
        let both = CriteriaSet {
            remote: BTreeSet::from([LocationMode::Remote, LocationMode::OnSite]),
            ..Default::default()
        };
        assert_eq!(filter(&postings, &both), filter(&postings, &CriteriaSet::default()));
    }

    #[test]
    fn test_both_location_modes_still_apply_other_clauses() {
        let postings = sample();
        let criteria = CriteriaSet {
            remote: BTreeSet::from([LocationMode::Remote, LocationMode::OnSite]),
            min_jd_salary: Some(50.0),
            ..Default::default()
        };
        assert_eq!(
            companies(&filter(&postings, &criteria)),
            vec!["beta", "ACME Corp", "Gamma"]
        );
    }

    #[test]
    fn test_tech_stack_membership() {
        let postings = sample();
        let criteria = CriteriaSet {
            tech_stack: BTreeSet::from(["rust".to_string(), "go".to_string()]),
            ..Default::default()
        };
        assert_eq!(
            companies(&filter(&postings, &criteria)),
            vec!["Acme", "ACME Corp", "Gamma"]
        );
    }

    #[test]
    fn test_job_role_membership() {
        let postings = sample();
        let criteria = CriteriaSet {
            job_role: BTreeSet::from(["frontend".to_string()]),
            ..Default::default()
        };
        assert_eq!(companies(&filter(&postings, &criteria)), vec!["beta"]);
    }

    #[test]
    fn test_min_salary() {
        let postings = sample();
        let criteria = CriteriaSet {
            min_jd_salary: Some(50.0),
            ..Default::default()
        };
        // ACME Corp and Gamma have no salary listed.
        assert_eq!(
            companies(&filter(&postings, &criteria)),
            vec!["beta", "ACME Corp", "Gamma"]
        );
    }

    #[test]
    fn test_all_clauses_combined() {
        let postings = sample();
        let criteria = CriteriaSet {
            min_exp: Some(1.0),
            company_name: Some("a".to_string()),
            remote: BTreeSet::from([LocationMode::OnSite]),
            tech_stack: BTreeSet::from(["rust".to_string()]),
            job_role: BTreeSet::from(["ios".to_string()]),
            min_jd_salary: None,
        };
        assert_eq!(companies(&filter(&postings, &criteria)), vec!["Gamma"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let postings = sample();
        let criteria = CriteriaSet {
            tech_stack: BTreeSet::from(["rust".to_string()]),
            min_exp: Some(2.0),
            ..Default::default()
        };
        let once: Vec<JobPosting> = filter(&postings, &criteria).into_iter().cloned().collect();
        let twice = filter(&once, &criteria);
        assert_eq!(twice.len(), once.len());
        assert!(twice.iter().zip(&once).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_criteria_from_form_json() {
        let json = r#"{
            "minExp": 2,
            "companyName": "acme",
            "remote": ["remote", "on-site"],
            "techStack": ["rust"],
            "jobRole": [],
            "minJdSalary": 30
        }"#;
        let criteria: CriteriaSet = serde_json::from_str(json).unwrap();
        assert_eq!(criteria.min_exp, Some(2.0));
        assert_eq!(criteria.company_name.as_deref(), Some("acme"));
        assert_eq!(criteria.remote.len(), 2);
        assert!(criteria.tech_stack.contains("rust"));
        assert!(criteria.job_role.is_empty());
        assert_eq!(criteria.min_jd_salary, Some(30.0));
    }

    #[test]
    fn test_criteria_partial_json_defaults_rest() {
        let criteria: CriteriaSet = serde_json::from_str(r#"{"remote": ["on-site"]}"#).unwrap();
        assert_eq!(criteria.remote, BTreeSet::from([LocationMode::OnSite]));
        assert!(criteria.min_exp.is_none());
        assert!(!criteria.is_empty());
    }
}
