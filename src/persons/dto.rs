use serde::{Deserialize, Serialize};

use super::repo_types::{NewPerson, Person};

/// JSON body for `POST /add-person`; every field is required.
#[derive(Debug, Deserialize)]
pub struct AddPersonRequest {
    pub firstname: String,
    pub lastname: String,
    pub national_code: String,
    pub address: String,
    pub phone: String,
}

impl From<AddPersonRequest> for NewPerson {
    fn from(r: AddPersonRequest) -> Self {
        Self {
            firstname: r.firstname,
            lastname: r.lastname,
            national_code: r.national_code,
            address: r.address,
            phone: r.phone,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PersonResponse {
    pub firstname: String,
    pub lastname: String,
    pub national_code: String,
    pub address: String,
    pub phone: String,
}

impl From<Person> for PersonResponse {
    fn from(p: Person) -> Self {
        Self {
            firstname: p.firstname,
            lastname: p.lastname,
            national_code: p.national_code,
            address: p.address,
            phone: p.phone,
        }
    }
}
