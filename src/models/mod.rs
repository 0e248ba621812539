mod user;
mod vacation_plan;

pub use user::{NewUser, User};
pub use vacation_plan::{NewVacationPlan, VacationPlan, VacationPlanChanges};
