/// A configured job category with its ordered keyword variants. The list
/// order is fixed configuration: more specific variants come first and the
/// collection loop consumes them in that order.
#[derive(Debug)]
pub struct Profession {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

/// One generated query for a profession keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordQuery {
    pub keyword: &'static str,
    pub query: String,
}

impl Profession {
    /// Ordered, finite, restartable sequence of search queries. Purely
    /// deterministic string combination.
    pub fn queries(&self) -> impl Iterator<Item = KeywordQuery> + '_ {
        self.keywords.iter().map(|keyword| KeywordQuery {
            keyword,
            query: format!(
                r#"site:linkedin.com/in "Santa Clara University" "{}""#,
                keyword
            ),
        })
    }
}

pub const PROFESSIONS: &[Profession] = &[
    Profession {
        label: "Software Engineer",
        keywords: &[
            "Software Engineer",
            "Backend Developer",
            "Full Stack Engineer",
            "Platform Engineer",
            "SWE",
        ],
    },
    Profession {
        label: "Data Scientist",
        keywords: &["Data Scientist", "Machine Learning", "AI Research", "ML Engineer"],
    },
    Profession {
        label: "Product Manager",
        keywords: &["Product Manager", "Product Lead", "Product Owner"],
    },
    Profession {
        label: "UX/UI Designer",
        keywords: &["UX Designer", "UI/UX", "Product Design", "Interaction Designer"],
    },
    Profession {
        label: "Mechanical Engineer",
        keywords: &["Mechanical Engineer", "Product Development", "Manufacturing Engineer"],
    },
    Profession {
        label: "Electrical Engineer",
        keywords: &["Electrical Engineer", "Embedded Systems", "Hardware Engineer"],
    },
    Profession {
        label: "Investment Analyst",
        keywords: &[
            "Investment Analyst",
            "Equity Research",
            "Portfolio Analyst",
            "Buy-side Analyst",
        ],
    },
    Profession {
        label: "Consultant",
        keywords: &[
            "Consultant",
            "Strategy Consulting",
            "Management Consultant",
            "Business Analyst",
        ],
    },
    Profession {
        label: "Lawyer",
        keywords: &["Attorney", "Corporate Law", "Legal Counsel", "Litigation Associate"],
    },
    Profession {
        label: "Physician / Med",
        keywords: &[
            "Physician",
            "Doctor",
            "Healthcare",
            "Resident MD",
            "Medical Professional",
        ],
    },
    Profession {
        label: "Research Scientist",
        keywords: &[
            "Research Scientist",
            "PhD Candidate",
            "Lab Assistant",
            "Postdoctoral Researcher",
        ],
    },
    Profession {
        label: "Educator",
        keywords: &["Teacher", "Professor", "Lecturer", "Adjunct Instructor"],
    },
    Profession {
        label: "Journalist",
        keywords: &["Journalist", "News Reporter", "Editor", "Columnist"],
    },
    Profession {
        label: "Marketing / PR",
        keywords: &["Marketing", "Brand Manager", "Public Relations", "Content Marketing"],
    },
    Profession {
        label: "Designer / Creator",
        keywords: &["Graphic Designer", "Illustrator", "Creative Director", "Visual Designer"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_profession_has_keywords() {
        for profession in PROFESSIONS {
            assert!(
                !profession.keywords.is_empty(),
                "{} has no keyword variants",
                profession.label
            );
        }
    }

    #[test]
    fn queries_are_ordered_and_restartable() {
        let profession = &PROFESSIONS[0];
        let first: Vec<_> = profession.queries().collect();
        let second: Vec<_> = profession.queries().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), profession.keywords.len());
        assert_eq!(first[0].keyword, profession.keywords[0]);
    }

    #[test]
    fn query_scopes_to_linkedin_profiles_and_school() {
        let query = &PROFESSIONS[0].queries().next().unwrap().query;
        assert!(query.starts_with("site:linkedin.com/in"));
        assert!(query.contains(r#""Santa Clara University""#));
        assert!(query.contains(r#""Software Engineer""#));
    }
}
