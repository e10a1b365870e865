//! Form validation for listings and schedules.
//!
//! The forms derive [`Validate`]; each field rule is one of the predicates
//! below, which return `Ok(())` or a message meant for the person who
//! filled the form. Failed rules are flattened into [`Violations`] so every
//! message surfaces at once.

use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;
use validator::{Validate, ValidateArgs, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::models::{Location, NewListing, NewSchedule, ParkingId, ProfileId};

pub const MIN_DESCRIPTION_CHARS: usize = 10;
pub const MIN_PHONE_DIGITS: usize = 9;
pub const MAX_PHONE_DIGITS: usize = 15;

/// Every rule a submission broke
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .0.join("; "))]
pub struct Violations(pub Vec<String>);

impl Violations {
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationErrors> for Violations {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = Vec::new();
        collect_messages(&errors, &mut messages);
        Violations(messages)
    }
}

/// Field errors in field-name order, nested forms inlined, struct-level
/// errors last.
fn collect_messages(errors: &ValidationErrors, out: &mut Vec<String>) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by_key(|(field, _)| (**field == "__all__", field.to_string()));

    for (_, kind) in fields {
        match kind {
            ValidationErrorsKind::Field(list) => out.extend(list.iter().map(|error| {
                error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string())
            })),
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, out);
                }
            }
        }
    }
}

fn messages_of(result: Result<(), ValidationErrors>) -> Vec<String> {
    match result {
        Ok(()) => Vec::new(),
        Err(errors) => Violations::from(errors).0,
    }
}

/// Wraps a predicate outcome for the `Validate` derive
fn rule(code: &'static str, outcome: Result<(), String>) -> Result<(), ValidationError> {
    outcome.map_err(|message| {
        let mut error = ValidationError::new(code);
        error.message = Some(Cow::Owned(message));
        error
    })
}

/// Parses a strictly positive, finite decimal.
pub fn positive_number(field: &str, raw: &str) -> Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(format!("{field} must be a positive number")),
    }
}

pub fn validate_dimension(field: &str, raw: &str) -> Result<(), String> {
    positive_number(field, raw).map(|_| ())
}

pub fn validate_price(raw: &str) -> Result<(), String> {
    positive_number("Price", raw).map(|_| ())
}

/// Optional leading `+`, then 9 to 15 digits. Whitespace is ignored.
pub fn validate_phone(raw: &str) -> Result<(), String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);

    let well_formed = !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len());
    if well_formed {
        Ok(())
    } else {
        Err(format!(
            "Phone must contain {MIN_PHONE_DIGITS} to {MAX_PHONE_DIGITS} digits, optionally starting with +"
        ))
    }
}

pub fn parse_spaces(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err("Spaces must be a positive whole number".to_string()),
    }
}

pub fn validate_spaces(raw: &str) -> Result<(), String> {
    parse_spaces(raw).map(|_| ())
}

pub fn validate_description(raw: &str) -> Result<(), String> {
    if raw.trim().chars().count() >= MIN_DESCRIPTION_CHARS {
        Ok(())
    } else {
        Err(format!(
            "Description must be at least {MIN_DESCRIPTION_CHARS} characters long"
        ))
    }
}

pub fn validate_required(field: &str, raw: &str) -> Result<(), String> {
    if raw.trim().is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(())
    }
}

pub fn validate_latitude(value: f64) -> Result<(), String> {
    if (-90.0..=90.0).contains(&value) {
        Ok(())
    } else {
        Err(LATITUDE_MESSAGE.to_string())
    }
}

pub fn validate_longitude(value: f64) -> Result<(), String> {
    if (-180.0..=180.0).contains(&value) {
        Ok(())
    } else {
        Err(LONGITUDE_MESSAGE.to_string())
    }
}

/// The day must be today or later; time of day plays no part.
pub fn validate_schedule_day(day: NaiveDate, today: NaiveDate) -> Result<(), String> {
    if day < today {
        Err("Day cannot be in the past".to_string())
    } else {
        Ok(())
    }
}

pub fn validate_time_range(start: NaiveTime, end: NaiveTime) -> Result<(), String> {
    if start < end {
        Ok(())
    } else {
        Err("Start time must be before end time".to_string())
    }
}

const LATITUDE_MESSAGE: &str = "Latitude must be between -90 and 90";
const LONGITUDE_MESSAGE: &str = "Longitude must be between -180 and 180";

fn check_width(raw: &str) -> Result<(), ValidationError> {
    rule("dimension", validate_dimension("Width", raw))
}

fn check_length(raw: &str) -> Result<(), ValidationError> {
    rule("dimension", validate_dimension("Length", raw))
}

fn check_height(raw: &str) -> Result<(), ValidationError> {
    rule("dimension", validate_dimension("Height", raw))
}

fn check_price(raw: &str) -> Result<(), ValidationError> {
    rule("price", validate_price(raw))
}

fn check_phone(raw: &str) -> Result<(), ValidationError> {
    rule("phone", validate_phone(raw))
}

fn check_spaces(raw: &str) -> Result<(), ValidationError> {
    rule("spaces", validate_spaces(raw))
}

fn check_description(raw: &str) -> Result<(), ValidationError> {
    rule("description", validate_description(raw))
}

fn check_address(raw: &str) -> Result<(), ValidationError> {
    rule("required", validate_required("Address", raw))
}

fn check_district(raw: &str) -> Result<(), ValidationError> {
    rule("required", validate_required("District", raw))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocationForm {
    #[validate(custom(function = "check_address"))]
    pub address: String,
    pub street_number: Option<String>,
    pub street: String,
    #[validate(custom(function = "check_district"))]
    pub district: String,
    pub city: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
}

impl LocationForm {
    pub fn messages(&self) -> Vec<String> {
        messages_of(Validate::validate(self))
    }

    fn into_location(self) -> Location {
        Location {
            address: self.address.trim().to_string(),
            street_number: self
                .street_number
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            street: self.street.trim().to_string(),
            district: self.district.trim().to_string(),
            city: self.city.trim().to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Listing fields as typed by an owner
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListingForm {
    #[validate(custom(function = "check_width"))]
    pub width: String,
    #[validate(custom(function = "check_length"))]
    pub length: String,
    #[validate(custom(function = "check_height"))]
    pub height: String,
    #[validate(custom(function = "check_price"))]
    pub price: String,
    #[validate(custom(function = "check_phone"))]
    pub phone: String,
    #[validate(custom(function = "check_spaces"))]
    pub spaces: String,
    #[validate(custom(function = "check_description"))]
    pub description: String,
    #[validate(nested)]
    pub location: LocationForm,
}

impl ListingForm {
    /// Every broken rule, location included
    pub fn messages(&self) -> Vec<String> {
        messages_of(Validate::validate(self))
    }

    pub fn check(&self) -> Result<(), Violations> {
        Validate::validate(self).map_err(Violations::from)
    }

    /// Validates and converts into a creation payload owned by `owner`.
    pub fn into_new_listing(self, owner: ProfileId) -> Result<NewListing, Violations> {
        self.check()?;

        // check() has accepted every field, so these parses succeed
        let number = |field: &str, raw: &str| {
            positive_number(field, raw).map_err(|message| Violations(vec![message]))
        };
        let width = number("Width", &self.width)?;
        let length = number("Length", &self.length)?;
        let height = number("Height", &self.height)?;
        let price = number("Price", &self.price)?;
        let spaces = parse_spaces(&self.spaces).map_err(|message| Violations(vec![message]))?;

        Ok(NewListing {
            profile_id: owner,
            width,
            length,
            height,
            price,
            phone: self.phone.chars().filter(|c| !c.is_whitespace()).collect(),
            spaces,
            description: self.description.trim().to_string(),
            location: self.location.into_location(),
        })
    }
}

/// The calendar date schedule forms are checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleContext {
    pub today: NaiveDate,
}

fn check_day(day: &NaiveDate, context: &ScheduleContext) -> Result<(), ValidationError> {
    rule("day", validate_schedule_day(*day, context.today))
}

fn check_window(form: &ScheduleForm) -> Result<(), ValidationError> {
    rule("window", validate_time_range(form.start_time, form.end_time))
}

/// An availability window as entered by an owner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(context = ScheduleContext)]
#[validate(schema(function = "check_window", skip_on_field_errors = false))]
pub struct ScheduleForm {
    #[validate(custom(function = "check_day", use_context))]
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl ScheduleForm {
    pub fn new(day: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            day,
            start_time,
            end_time,
        }
    }

    pub fn messages(&self, today: NaiveDate) -> Vec<String> {
        messages_of(self.validate_with_args(&ScheduleContext { today }))
    }

    /// Checks against the local calendar date
    pub fn messages_now(&self) -> Vec<String> {
        self.messages(Local::now().date_naive())
    }

    pub fn check(&self, today: NaiveDate) -> Result<(), Violations> {
        self.validate_with_args(&ScheduleContext { today })
            .map_err(Violations::from)
    }

    pub fn into_new_schedule(
        self,
        parking_id: ParkingId,
        today: NaiveDate,
    ) -> Result<NewSchedule, Violations> {
        self.check(today)?;
        Ok(NewSchedule {
            parking_id,
            day: self.day,
            start_time: self.start_time,
            end_time: self.end_time,
            available: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ListingForm {
        ListingForm {
            width: "2.5".to_string(),
            length: "5".to_string(),
            height: "2.1".to_string(),
            price: "15".to_string(),
            phone: "+51 987 654 321".to_string(),
            spaces: "2".to_string(),
            description: "  Covered garage with CCTV  ".to_string(),
            location: LocationForm {
                address: "Av. Larco 123".to_string(),
                street_number: Some(" ".to_string()),
                street: "Av. Larco".to_string(),
                district: "Miraflores".to_string(),
                city: "Lima".to_string(),
                latitude: -12.12,
                longitude: -77.03,
            },
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn phone_rules() {
        assert!(validate_phone("+51987654321").is_ok());
        assert!(validate_phone("987 654 321").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("+1234567890123456").is_err());
        assert!(validate_phone("98765432a").is_err());
        assert!(validate_phone("++51987654321").is_err());
        assert!(validate_phone("+").is_err());
    }

    #[test]
    fn description_needs_ten_characters() {
        assert!(validate_description("0123456789").is_ok());
        assert!(validate_description("012345678").is_err());
        assert!(validate_description("   012345678   ").is_err());
    }

    #[test]
    fn numbers_must_be_positive() {
        assert!(validate_dimension("Width", "2.5").is_ok());
        assert_eq!(
            validate_dimension("Width", "0"),
            Err("Width must be a positive number".to_string())
        );
        assert!(validate_price("-3").is_err());
        assert!(validate_price("abc").is_err());
        assert!(validate_price("inf").is_err());
        assert!(validate_spaces("3").is_ok());
        assert!(validate_spaces("0").is_err());
        assert!(validate_spaces("1.5").is_err());
    }

    #[test]
    fn coordinates_are_range_checked() {
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(-90.1).is_err());
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(180.5).is_err());
    }

    #[test]
    fn listing_form_reports_every_violation() {
        let mut form = valid_form();
        assert!(form.messages().is_empty());

        form.width = "0".to_string();
        form.phone = "12345".to_string();
        form.description = "short".to_string();
        form.location.district = "  ".to_string();
        form.location.latitude = 120.0;

        let messages = form.messages();
        assert_eq!(messages.len(), 5);
        assert!(messages.contains(&"Width must be a positive number".to_string()));
        assert!(messages.contains(&"District is required".to_string()));
        assert!(messages.contains(&"Latitude must be between -90 and 90".to_string()));
    }

    #[test]
    fn location_errors_are_nested_under_location() {
        let mut form = valid_form();
        form.location.address = String::new();
        form.location.longitude = -181.0;

        let errors = Validate::validate(&form).unwrap_err();
        assert!(errors.errors().contains_key("location"));
        assert!(!errors.errors().contains_key("phone"));

        assert_eq!(
            form.location.messages(),
            vec![
                "Address is required".to_string(),
                "Longitude must be between -180 and 180".to_string()
            ]
        );
        assert_eq!(Violations::from(errors).len(), 2);
    }

    #[test]
    fn schedule_window_error_is_struct_level() {
        let form = ScheduleForm::new(date(12), t(10), t(9));
        let errors = form
            .validate_with_args(&ScheduleContext { today: date(10) })
            .unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
        assert!(!errors.errors().contains_key("day"));
    }

    #[test]
    fn valid_form_becomes_new_listing() {
        let listing = valid_form().into_new_listing(12).unwrap();
        assert_eq!(listing.profile_id, 12);
        assert_eq!(listing.price, 15.0);
        assert_eq!(listing.spaces, 2);
        assert_eq!(listing.phone, "+51987654321");
        assert_eq!(listing.description, "Covered garage with CCTV");
        assert_eq!(listing.location.street_number, None);
    }

    #[test]
    fn invalid_form_is_not_converted() {
        let mut form = valid_form();
        form.price = "".to_string();
        form.spaces = "-1".to_string();
        let err = form.into_new_listing(12).unwrap_err();
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn schedule_form_rules() {
        let today = date(10);
        assert!(ScheduleForm::new(date(10), t(8), t(9)).messages(today).is_empty());
        assert!(ScheduleForm::new(date(11), t(8), t(9)).messages(today).is_empty());

        let both = ScheduleForm::new(date(9), t(9), t(9)).messages(today);
        assert_eq!(
            both,
            vec![
                "Day cannot be in the past".to_string(),
                "Start time must be before end time".to_string()
            ]
        );
    }

    #[test]
    fn schedule_form_becomes_available_schedule() {
        let schedule = ScheduleForm::new(date(10), t(8), t(12))
            .into_new_schedule(4, date(1))
            .unwrap();
        assert_eq!(schedule.parking_id, 4);
        assert!(schedule.available);

        let err = ScheduleForm::new(date(10), t(12), t(8))
            .into_new_schedule(4, date(1))
            .unwrap_err();
        assert_eq!(err.to_string(), "Start time must be before end time");
    }
}
