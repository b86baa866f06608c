//! Static enumeration data.
//!
//! Codes follow the numbering of the screening programme's valid-value
//! sets. The tables deliberately contain only real codes: sentinel values
//! such as "Null", "Not Null" and "Unchanged" are recognised by the query
//! compiler and never appear here.

pub(crate) const SCREENING_STATUS: &[(i32, &str)] = &[
    (4001, "Inactive"),
    (4002, "Call"),
    (4003, "Recall"),
    (4004, "Opt-in"),
    (4005, "Self-referral"),
    (4006, "Surveillance"),
    (4007, "Seeking Further Data"),
    (4008, "Ceased"),
];

pub(crate) const SS_REASON: &[(i32, &str)] = &[
    (11301, "Routine"),
    (11302, "Failsafe Trawl"),
    (11303, "Manual Amendment"),
    (11304, "Episode Closed"),
    (11305, "Discharge"),
];

pub(crate) const SDD_REASON: &[(i32, &str)] = &[
    (11401, "Invitation"),
    (11402, "Result"),
    (11403, "Manual Amendment"),
    (11404, "Failsafe"),
];

pub(crate) const SURVEILLANCE_REASON: &[(i32, &str)] = &[
    (11501, "Polyp Surveillance"),
    (11502, "Lynch Surveillance"),
    (11503, "Manual Amendment"),
];

pub(crate) const CEASE_REASON: &[(i32, &str)] = &[
    (4301, "Informed Dissent"),
    (4302, "Informed Choice"),
    (4303, "No Functioning Colon"),
    (4304, "Deceased"),
    (4305, "Moved Away"),
];

pub(crate) const EPISODE_STATUS: &[(i32, &str)] = &[
    (1101, "Open"),
    (1102, "Paused"),
    (1103, "Closed"),
];

pub(crate) const GENDER: &[(i32, &str)] = &[
    (0, "Not Known"),
    (1, "Male"),
    (2, "Female"),
    (9, "Not Specified"),
];

pub(crate) const EVENT_STATUS: &[(i32, &str)] = &[
    (2001, "Invitation Sent"),
    (2002, "Test Kit Dispatched"),
    (2003, "Test Kit Returned"),
    (2004, "Test Kit Spoilt"),
    (2005, "Normal Result"),
    (2006, "Abnormal Result"),
    (2007, "Weak Positive Result"),
    (2008, "Referred For Assessment"),
    (2009, "Colonoscopy Performed"),
    (2010, "Polypectomy Performed"),
    (2011, "Subject Discharged"),
    (2012, "Subject Non-responder"),
    (2013, "Surveillance Invitation Sent"),
    (2014, "Diagnosis Recorded"),
];
