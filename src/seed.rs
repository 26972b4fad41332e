//! Demo mentor roster and admin bootstrap

use crate::models::{ProfileUpdate, Role};
use crate::services::{NewUser, PostgresClient, PostgresError};

/// A demo mentor inserted by the admin seeding endpoint
#[derive(Debug, Clone, Copy)]
pub struct DemoMentor {
    pub name: &'static str,
    pub email: &'static str,
    pub skills: &'static [&'static str],
    pub bio: &'static str,
    pub experience_years: i32,
    pub hourly_rate: f64,
    pub avatar_url: &'static str,
}

impl DemoMentor {
    fn profile(&self) -> ProfileUpdate {
        ProfileUpdate {
            bio: self.bio.to_string(),
            skills: self.skills.iter().map(|s| s.to_string()).collect(),
            experience_years: self.experience_years,
            hourly_rate: self.hourly_rate,
            available: true,
            avatar_url: self.avatar_url.to_string(),
        }
    }
}

pub const DEMO_MENTORS: &[DemoMentor] = &[
    DemoMentor {
        name: "Dr. Sarah Chen",
        email: "sarah.chen@email.com",
        skills: &["Machine Learning", "Python", "TensorFlow", "Data Science"],
        bio: "PhD in Computer Science with 10+ years in AI/ML. Former Google researcher, now helping startups implement AI solutions.",
        experience_years: 10,
        hourly_rate: 120.0,
        avatar_url: "https://images.unsplash.com/photo-1494790108755-2616b612b786?w=150",
    },
    DemoMentor {
        name: "Marcus Rodriguez",
        email: "marcus.rodriguez@email.com",
        skills: &["React", "Node.js", "JavaScript", "Full Stack"],
        bio: "Senior Full Stack Developer at Meta. Specialized in React ecosystem and modern web development practices.",
        experience_years: 8,
        hourly_rate: 95.0,
        avatar_url: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150",
    },
    DemoMentor {
        name: "Emily Johnson",
        email: "emily.johnson@email.com",
        skills: &["Product Management", "Strategy", "Agile", "Leadership"],
        bio: "VP of Product at successful fintech startup. Expert in product strategy, user research, and team leadership.",
        experience_years: 12,
        hourly_rate: 150.0,
        avatar_url: "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=150",
    },
    DemoMentor {
        name: "David Kim",
        email: "david.kim@email.com",
        skills: &["DevOps", "AWS", "Docker", "Kubernetes"],
        bio: "Cloud Infrastructure Engineer with expertise in AWS, containerization, and CI/CD pipelines. Helped scale multiple startups.",
        experience_years: 9,
        hourly_rate: 110.0,
        avatar_url: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150",
    },
    DemoMentor {
        name: "Rachel Green",
        email: "rachel.green@email.com",
        skills: &["UI/UX Design", "Figma", "User Research", "Prototyping"],
        bio: "Senior UX Designer at Apple. Passionate about creating intuitive user experiences and mentoring junior designers.",
        experience_years: 7,
        hourly_rate: 85.0,
        avatar_url: "https://images.unsplash.com/photo-1544005313-94ddf0286df2?w=150",
    },
    DemoMentor {
        name: "James Wilson",
        email: "james.wilson@email.com",
        skills: &["Java", "Spring Boot", "Microservices", "Architecture"],
        bio: "Enterprise Software Architect with 15+ years experience. Specialized in large-scale distributed systems and team mentoring.",
        experience_years: 15,
        hourly_rate: 130.0,
        avatar_url: "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=150",
    },
    DemoMentor {
        name: "Lisa Wang",
        email: "lisa.wang@email.com",
        skills: &["Data Analysis", "SQL", "Python", "Business Intelligence"],
        bio: "Senior Data Analyst at Netflix. Expert in data visualization, statistical analysis, and business intelligence.",
        experience_years: 6,
        hourly_rate: 75.0,
        avatar_url: "https://images.unsplash.com/photo-1487412720507-e7ab37603c6f?w=150",
    },
    DemoMentor {
        name: "Michael Brown",
        email: "michael.brown@email.com",
        skills: &["Cybersecurity", "Penetration Testing", "Network Security", "Compliance"],
        bio: "Cybersecurity expert with government and enterprise experience. Specialized in threat assessment and security architecture.",
        experience_years: 11,
        hourly_rate: 140.0,
        avatar_url: "https://images.unsplash.com/photo-1560250097-0b93528c311a?w=150",
    },
    DemoMentor {
        name: "Jennifer Davis",
        email: "jennifer.davis@email.com",
        skills: &["Mobile Development", "Swift", "iOS", "Android"],
        bio: "Mobile app developer with 50+ apps published. Former iOS engineer at Uber, now freelancing and mentoring.",
        experience_years: 9,
        hourly_rate: 100.0,
        avatar_url: "https://images.unsplash.com/photo-1489424731084-a5d8b219a5bb?w=150",
    },
    DemoMentor {
        name: "Robert Taylor",
        email: "robert.taylor@email.com",
        skills: &["Blockchain", "Solidity", "Web3", "Smart Contracts"],
        bio: "Blockchain developer and consultant. Built DeFi protocols and NFT platforms. Early adopter with deep Web3 expertise.",
        experience_years: 5,
        hourly_rate: 160.0,
        avatar_url: "https://images.unsplash.com/photo-1463453091185-61582044d556?w=150",
    },
    DemoMentor {
        name: "Amanda Martinez",
        email: "amanda.martinez@email.com",
        skills: &["Digital Marketing", "SEO", "Content Strategy", "Analytics"],
        bio: "Digital marketing expert with proven track record of growing startups. Specialized in SEO, content marketing, and growth hacking.",
        experience_years: 8,
        hourly_rate: 80.0,
        avatar_url: "https://images.unsplash.com/photo-1508214751196-bcfd4ca60f91?w=150",
    },
    DemoMentor {
        name: "Chris Anderson",
        email: "chris.anderson@email.com",
        skills: &["Sales", "Business Development", "Negotiation", "CRM"],
        bio: "VP of Sales with consistent record of exceeding targets. Expert in B2B sales, team building, and sales process optimization.",
        experience_years: 13,
        hourly_rate: 125.0,
        avatar_url: "https://images.unsplash.com/photo-1519244703995-f4e0f30006d5?w=150",
    },
    DemoMentor {
        name: "Nicole Thompson",
        email: "nicole.thompson@email.com",
        skills: &["Finance", "Investment", "Financial Planning", "Startups"],
        bio: "Former Goldman Sachs analyst, now startup CFO. Expert in financial modeling, fundraising, and strategic planning.",
        experience_years: 10,
        hourly_rate: 135.0,
        avatar_url: "https://images.unsplash.com/photo-1534528741775-53994a69daeb?w=150",
    },
    DemoMentor {
        name: "Kevin Lee",
        email: "kevin.lee@email.com",
        skills: &["Operations", "Process Optimization", "Lean", "Six Sigma"],
        bio: "Operations expert with experience scaling companies from 10 to 1000+ employees. Specialized in process improvement and efficiency.",
        experience_years: 12,
        hourly_rate: 115.0,
        avatar_url: "https://images.unsplash.com/photo-1507591064344-4c6ce005b128?w=150",
    },
    DemoMentor {
        name: "Sophia Rodriguez",
        email: "sophia.rodriguez@email.com",
        skills: &["HR", "Talent Acquisition", "People Operations", "Culture"],
        bio: "Head of People at fast-growing tech company. Expert in hiring, culture building, and employee engagement strategies.",
        experience_years: 9,
        hourly_rate: 90.0,
        avatar_url: "https://images.unsplash.com/photo-1517841905240-472988babdf9?w=150",
    },
];

/// Insert the demo roster, verified, all sharing one password hash
///
/// Mentors whose email is already registered are skipped, so the call can be
/// repeated. Returns `(created, skipped)`.
pub async fn seed_demo_mentors(
    postgres: &PostgresClient,
    password_hash: &str,
) -> Result<(usize, usize), PostgresError> {
    let mut created = 0;
    let mut skipped = 0;

    for mentor in DEMO_MENTORS {
        let new_user = NewUser {
            email: mentor.email.to_string(),
            name: mentor.name.to_string(),
            password_hash: password_hash.to_string(),
            role: Role::Mentor,
            is_verified: true,
        };

        match postgres.create_user(&new_user, &mentor.profile()).await {
            Ok(_) => created += 1,
            Err(PostgresError::Duplicate(_)) => skipped += 1,
            Err(e) => return Err(e),
        }
    }

    tracing::info!("Seeded demo mentors: {} created, {} skipped", created, skipped);

    Ok((created, skipped))
}

/// Create the configured admin account unless the email is already taken
///
/// Returns `true` when a new account was written.
pub async fn ensure_admin(
    postgres: &PostgresClient,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<bool, PostgresError> {
    if postgres.find_user_by_email(email).await?.is_some() {
        return Ok(false);
    }

    let admin = NewUser {
        email: email.to_string(),
        name: name.to_string(),
        password_hash: password_hash.to_string(),
        role: Role::Admin,
        is_verified: true,
    };
    let profile = ProfileUpdate {
        bio: "Platform Administrator".to_string(),
        available: false,
        ..ProfileUpdate::default()
    };

    match postgres.create_user(&admin, &profile).await {
        Ok(_) => Ok(true),
        Err(PostgresError::Duplicate(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use validator::Validate;

    #[test]
    fn test_demo_emails_are_unique() {
        let emails: HashSet<&str> = DEMO_MENTORS.iter().map(|m| m.email).collect();
        assert_eq!(emails.len(), DEMO_MENTORS.len());
    }

    #[test]
    fn test_demo_profiles_pass_validation() {
        for mentor in DEMO_MENTORS {
            let profile = mentor.profile();
            assert!(profile.validate().is_ok(), "{} has an invalid profile", mentor.name);
            assert!(profile.available);
        }
    }
}
