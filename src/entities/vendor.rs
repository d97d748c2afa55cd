// Vendor Entity - suppliers with contact details, quote and star rating

use serde::{Deserialize, Serialize};

use super::{require_amount, require_text, Draft, Entity, EntityKind, Patch};
use crate::error::ValidationError;

pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub website: String,
    /// Quoted price
    #[serde(default)]
    pub price: f64,
    /// 0 means not rated yet
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub notes: String,
}

impl Entity for Vendor {
    const KIND: EntityKind = EntityKind::Vendor;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "name", &self.name)?;
        require_amount(Self::KIND, "price", self.price)?;
        if self.rating > MAX_RATING {
            return Err(ValidationError::new(
                Self::KIND,
                "rating",
                format!("Must be between 0 and {}, got {}", MAX_RATING, self.rating),
            ));
        }
        Ok(())
    }
}

/// New vendors always start unrated; rating is set through an edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewVendor {
    pub name: String,
    pub category: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub price: Option<f64>,
    pub notes: Option<String>,
}

impl NewVendor {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        NewVendor {
            name: name.into(),
            category: Some(category.into()),
            ..Default::default()
        }
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}

impl Draft for NewVendor {
    type Entity = Vendor;

    fn into_entity(self, id: String) -> Vendor {
        Vendor {
            id,
            name: self.name.trim().to_string(),
            category: self.category.map(|c| c.trim().to_string()).unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            website: self.website.unwrap_or_default(),
            price: self.price.unwrap_or(0.0),
            rating: 0,
            notes: self.notes.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<u8>,
    pub notes: Option<String>,
}

impl VendorPatch {
    pub fn rating(rating: u8) -> Self {
        VendorPatch {
            rating: Some(rating),
            ..Default::default()
        }
    }
}

impl Patch for VendorPatch {
    type Entity = Vendor;

    fn apply_to(self, vendor: &mut Vendor) {
        if let Some(name) = self.name {
            vendor.name = name.trim().to_string();
        }
        if let Some(category) = self.category {
            vendor.category = category.trim().to_string();
        }
        if let Some(phone) = self.phone {
            vendor.phone = phone;
        }
        if let Some(email) = self.email {
            vendor.email = email;
        }
        if let Some(website) = self.website {
            vendor.website = website;
        }
        if let Some(price) = self.price {
            vendor.price = price;
        }
        if let Some(rating) = self.rating {
            vendor.rating = rating;
        }
        if let Some(notes) = self.notes {
            vendor.notes = notes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vendor_starts_unrated() {
        let vendor = NewVendor::new("Alon DJ", "music")
            .price(3000.0)
            .into_entity("v1".to_string());

        assert_eq!(vendor.rating, 0);
        assert_eq!(vendor.price, 3000.0);
        assert!(vendor.validate().is_ok());
    }

    #[test]
    fn test_rating_above_five_rejected() {
        let mut vendor = NewVendor::new("Alon DJ", "music").into_entity("v1".to_string());
        VendorPatch::rating(6).apply_to(&mut vendor);

        let err = vendor.validate().unwrap_err();
        assert_eq!(err.field, "rating");
    }
}
