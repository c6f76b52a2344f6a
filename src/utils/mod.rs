pub mod get_record_id;
pub mod jwt;
pub mod password_rules;
pub mod pwd;
pub mod time;
pub mod token;
pub mod validated_form;
