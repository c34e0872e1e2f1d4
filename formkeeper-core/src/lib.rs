//! Rule-driven form validation
//!
//! Rules are data: named field and selection templates plus the forms that
//! use them. The [`Engine`] resolves template references, runs each value
//! through its filters and constraints, and collects the outcome in a
//! [`ValidationResult`].
//!
//! # Examples
//!
//! ## Validating a form
//!
//! ```
//! use formkeeper_core::{Constraint, Engine, Field, Form, FormValues, Rule};
//!
//! let rule = Rule::new().with_form(
//!     "signin",
//!     Form::new()
//!         .with_field(
//!             Field::new("username")
//!                 .with_required(true)
//!                 .with_filter("trim")
//!                 .with_filter("uppercase")
//!                 .with_constraint(
//!                     Constraint::new("length")
//!                         .with_criterion("from", 3)
//!                         .with_criterion("to", 20),
//!                 ),
//!         )
//!         .with_field(
//!             Field::new("password")
//!                 .with_message("invalid password")
//!                 .with_constraint(
//!                     Constraint::new("length")
//!                         .with_message("password is too short")
//!                         .with_criterion("from", 8)
//!                         .with_criterion("to", 100),
//!                 ),
//!         ),
//! );
//!
//! let input = FormValues::from_query("username=foobar&password=short").unwrap();
//! let result = Engine::new().validate(&rule, "signin", &input).unwrap();
//!
//! assert_eq!(result.valid_param("username"), "FOOBAR");
//! assert!(result.failed_on_constraint("password", "length"));
//! assert_eq!(result.messages(), vec!["invalid password"]);
//! ```
//!
//! ## Custom validators
//!
//! ```
//! use formkeeper_core::{Constraint, Engine, Form, FormValues, Rule, Selection, validator_fn};
//!
//! let engine = Engine::new().with_validator(
//!     "included",
//!     validator_fn(|value, criteria| Ok(criteria.strings("values")?.contains(&value))),
//! );
//!
//! let rule = Rule::new().with_form(
//!     "vote",
//!     Form::new().with_selection(
//!         Selection::new("choice")
//!             .with_count(1, 1)
//!             .with_constraint(Constraint::new("included").with_criterion("values", vec!["1", "2"])),
//!     ),
//! );
//!
//! let input = FormValues::from_query("choice=3").unwrap();
//! let result = engine.validate(&rule, "vote", &input).unwrap();
//! assert!(result.failed_on_constraint("choice", "included"));
//! ```

mod criteria;
mod engine;
mod error;
mod filters;
mod result;
mod rule;
mod source;
mod validators;

pub use criteria::*;
pub use engine::*;
pub use error::*;
pub use filters::*;
pub use result::*;
pub use rule::*;
pub use source::*;
pub use validators::*;
