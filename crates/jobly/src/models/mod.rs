//! Records and query façades for the service's entities.

pub mod company;
pub mod job;


pub use company::Company;
pub use job::{
    JOB_FIELDS, Job, JobDetail, JobListing, JobSearchQuery, JobUpdateInput, NewJob, NewJobInput,
};
