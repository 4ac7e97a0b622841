//! `facilityhub-admin` — roles, modules and departments managed by tenant
//! administrators, plus the request validation rules guarding them.

pub mod department;
pub mod error;
pub mod module;
pub mod repository;
pub mod role;
pub mod service;
pub mod validation;

pub use department::{Department, DepartmentInput};
pub use error::AdminError;
pub use module::{Module, ModuleInput};
pub use repository::{DepartmentRepository, ModuleRepository, RoleRepository};
pub use role::{Role, RoleInput};
pub use validation::{Rule, RuleSet, ValidationErrors, Validator};
