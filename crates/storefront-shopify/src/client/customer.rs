//! Customer accounts: sign-up, sign-in, password recovery, profile and
//! saved addresses.
//!
//! Every call that acts on an existing account takes the customer access
//! token issued by [`StorefrontClient::create_access_token`]. Keeping the
//! token is the caller's job.

use serde::{Deserialize, Serialize};
use serde_json::json;
use storefront_core::{Customer, CustomerAccessToken, CustomerProfile, MailingAddress};

use crate::error::StorefrontError;
use crate::queries;
use crate::reshape::{access_token, customer_profile, mailing_address, reshape_customer};
use crate::types::{
    ShopifyAccessToken, ShopifyCustomer, ShopifyCustomerProfile, ShopifyMailingAddress, UserError,
};

use super::StorefrontClient;

/// User-error codes meaning the access token no longer identifies anyone.
const INVALID_TOKEN_CODES: [&str; 2] = ["UNIDENTIFIED_CUSTOMER", "TOKEN_INVALID"];

/// Sign-up form, sent as `CustomerCreateInput`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub accepts_marketing: bool,
}

impl std::fmt::Debug for NewCustomer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewCustomer")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("accepts_marketing", &self.accepts_marketing)
            .finish_non_exhaustive()
    }
}

/// Sign-in form, sent as `CustomerAccessTokenCreateInput`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Address fields, sent as `MailingAddressInput`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Returns the result of a mutation made with a customer access token, or
/// the error its user errors describe.
fn accept<T>(operation: &str, result: Option<T>, errors: Vec<UserError>) -> Result<T, StorefrontError> {
    if errors
        .iter()
        .any(|e| e.code.as_deref().is_some_and(|c| INVALID_TOKEN_CODES.contains(&c)))
    {
        tracing::warn!(operation, "customer access token rejected");
        return Err(StorefrontError::InvalidCustomerToken {
            operation: operation.to_owned(),
        });
    }
    accept_anonymous(operation, result, errors)
}

/// Like [`accept`] for mutations made before sign-in, where an unidentified
/// customer means bad credentials.
fn accept_anonymous<T>(
    operation: &str,
    result: Option<T>,
    errors: Vec<UserError>,
) -> Result<T, StorefrontError> {
    if let Some(result) = result.filter(|_| errors.is_empty()) {
        return Ok(result);
    }
    let message = errors
        .into_iter()
        .next()
        .map_or_else(|| "no result returned".to_owned(), |e| e.message);
    tracing::warn!(operation, %message, "customer mutation rejected");
    Err(StorefrontError::UserErrors {
        operation: operation.to_owned(),
        message,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateData {
    customer_create: CreatePayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePayload {
    customer: Option<ShopifyCustomerProfile>,
    #[serde(default)]
    customer_user_errors: Vec<UserError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenData {
    customer_access_token_create: TokenPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPayload {
    customer_access_token: Option<ShopifyAccessToken>,
    #[serde(default)]
    customer_user_errors: Vec<UserError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecoverData {
    customer_recover: RecoverPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecoverPayload {
    #[serde(default)]
    customer_user_errors: Vec<UserError>,
}

#[derive(Deserialize)]
struct CustomerData {
    customer: Option<ShopifyCustomer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressPayload {
    customer_address: Option<ShopifyMailingAddress>,
    #[serde(default)]
    customer_user_errors: Vec<UserError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressCreateData {
    customer_address_create: AddressPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressUpdateData {
    customer_address_update: AddressPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressDeleteData {
    customer_address_delete: AddressDeletePayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressDeletePayload {
    deleted_customer_address_id: Option<String>,
    #[serde(default)]
    customer_user_errors: Vec<UserError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefaultAddressData {
    customer_default_address_update: DefaultAddressPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefaultAddressPayload {
    customer: Option<DefaultAddressCustomer>,
    #[serde(default)]
    customer_user_errors: Vec<UserError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefaultAddressCustomer {
    default_address: Option<ShopifyMailingAddress>,
}

impl StorefrontClient {
    /// Registers a new customer account.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UserErrors`] when the API refuses the
    /// sign-up, e.g. for an email that is already taken.
    pub async fn create_customer(&self, input: &NewCustomer) -> Result<CustomerProfile, StorefrontError> {
        let data: CreateData = self
            .request("createCustomer", queries::CUSTOMER_CREATE, json!({ "input": input }))
            .await?;
        let payload = data.customer_create;
        let profile = accept_anonymous("createCustomer", payload.customer, payload.customer_user_errors)?;
        tracing::info!("customer account created");
        Ok(customer_profile(profile))
    }

    /// Signs a customer in.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UserErrors`] for unknown credentials, never
    /// [`StorefrontError::InvalidCustomerToken`].
    pub async fn create_access_token(
        &self,
        credentials: &Credentials,
    ) -> Result<CustomerAccessToken, StorefrontError> {
        let data: TokenData = self
            .request(
                "createAccessToken",
                queries::CUSTOMER_ACCESS_TOKEN_CREATE,
                json!({ "input": credentials }),
            )
            .await?;
        let payload = data.customer_access_token_create;
        let token = accept_anonymous(
            "createAccessToken",
            payload.customer_access_token,
            payload.customer_user_errors,
        )?;
        tracing::info!(expires_at = %token.expires_at, "customer signed in");
        Ok(access_token(token))
    }

    /// Sends a password-reset email.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UserErrors`] when the API refuses the
    /// request.
    pub async fn recover_customer(&self, email: &str) -> Result<(), StorefrontError> {
        let data: RecoverData = self
            .request("recoverCustomer", queries::CUSTOMER_RECOVER, json!({ "email": email }))
            .await?;
        accept_anonymous("recoverCustomer", Some(()), data.customer_recover.customer_user_errors)?;
        tracing::info!("customer recovery email sent");
        Ok(())
    }

    /// Fetches the signed-in customer's profile, addresses and orders.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::InvalidCustomerToken`] when the token does
    /// not identify a customer.
    pub async fn get_customer(&self, customer_token: &str) -> Result<Customer, StorefrontError> {
        let data: CustomerData = self
            .request(
                "getCustomer",
                queries::GET_CUSTOMER,
                json!({ "customerAccessToken": customer_token }),
            )
            .await?;
        let customer = data.customer.ok_or_else(|| {
            tracing::warn!("customer access token did not resolve to a customer");
            StorefrontError::InvalidCustomerToken {
                operation: "getCustomer".to_owned(),
            }
        })?;
        Ok(reshape_customer(customer))
    }

    /// # Errors
    ///
    /// Returns [`StorefrontError::UserErrors`] when the address is refused and
    /// [`StorefrontError::InvalidCustomerToken`] for a stale token.
    pub async fn create_address(
        &self,
        customer_token: &str,
        address: &AddressInput,
    ) -> Result<MailingAddress, StorefrontError> {
        let data: AddressCreateData = self
            .request(
                "createAddress",
                queries::CUSTOMER_ADDRESS_CREATE,
                json!({ "customerAccessToken": customer_token, "address": address }),
            )
            .await?;
        let payload = data.customer_address_create;
        let created = accept("createAddress", payload.customer_address, payload.customer_user_errors)?;
        tracing::info!(address_id = %created.id, "customer address created");
        Ok(mailing_address(created))
    }

    /// # Errors
    ///
    /// Same as [`StorefrontClient::create_address`].
    pub async fn update_address(
        &self,
        customer_token: &str,
        address_id: &str,
        address: &AddressInput,
    ) -> Result<MailingAddress, StorefrontError> {
        let data: AddressUpdateData = self
            .request(
                "updateAddress",
                queries::CUSTOMER_ADDRESS_UPDATE,
                json!({
                    "customerAccessToken": customer_token,
                    "id": address_id,
                    "address": address,
                }),
            )
            .await?;
        let payload = data.customer_address_update;
        let updated = accept("updateAddress", payload.customer_address, payload.customer_user_errors)?;
        Ok(mailing_address(updated))
    }

    /// Deletes an address and returns the deleted id.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::create_address`].
    pub async fn delete_address(
        &self,
        customer_token: &str,
        address_id: &str,
    ) -> Result<String, StorefrontError> {
        let data: AddressDeleteData = self
            .request(
                "deleteAddress",
                queries::CUSTOMER_ADDRESS_DELETE,
                json!({ "customerAccessToken": customer_token, "id": address_id }),
            )
            .await?;
        let payload = data.customer_address_delete;
        let deleted = accept(
            "deleteAddress",
            payload.deleted_customer_address_id,
            payload.customer_user_errors,
        )?;
        tracing::info!(address_id = %deleted, "customer address deleted");
        Ok(deleted)
    }

    /// Makes `address_id` the customer's default address and returns it.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::create_address`].
    pub async fn set_default_address(
        &self,
        customer_token: &str,
        address_id: &str,
    ) -> Result<Option<MailingAddress>, StorefrontError> {
        let data: DefaultAddressData = self
            .request(
                "setDefaultAddress",
                queries::CUSTOMER_DEFAULT_ADDRESS_UPDATE,
                json!({ "customerAccessToken": customer_token, "addressId": address_id }),
            )
            .await?;
        let payload = data.customer_default_address_update;
        let customer = accept("setDefaultAddress", payload.customer, payload.customer_user_errors)?;
        Ok(customer.default_address.map(mailing_address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_error(code: Option<&str>, message: &str) -> UserError {
        UserError {
            code: code.map(str::to_owned),
            field: None,
            message: message.to_owned(),
        }
    }

    #[test]
    fn sign_up_form_serializes_as_customer_create_input() {
        let input = NewCustomer {
            email: "ana@example.com".to_owned(),
            password: "hunter22".to_owned(),
            first_name: Some("Ana".to_owned()),
            last_name: None,
            phone: None,
            accepts_marketing: true,
        };
        assert_eq!(
            serde_json::to_value(&input).expect("serialize"),
            json!({
                "email": "ana@example.com",
                "password": "hunter22",
                "firstName": "Ana",
                "acceptsMarketing": true
            })
        );
        assert!(!format!("{input:?}").contains("hunter22"));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials {
            email: "ana@example.com".to_owned(),
            password: "hunter22".to_owned(),
        };
        assert!(!format!("{credentials:?}").contains("hunter22"));
    }

    #[test]
    fn first_user_error_becomes_the_message() {
        let err = accept::<()>(
            "createCustomer",
            None,
            vec![user_error(Some("TAKEN"), "Email has already been taken"), user_error(None, "second")],
        )
        .unwrap_err();
        assert!(
            matches!(&err, StorefrontError::UserErrors { message, .. } if message == "Email has already been taken"),
            "got: {err:?}"
        );
    }

    #[test]
    fn user_errors_win_over_a_returned_result() {
        let err = accept("recoverCustomer", Some(()), vec![user_error(None, "Could not find customer")]);
        assert!(matches!(err, Err(StorefrontError::UserErrors { .. })));
    }

    #[test]
    fn unidentified_customer_code_means_a_stale_token() {
        let err = accept::<String>(
            "deleteAddress",
            None,
            vec![user_error(Some("UNIDENTIFIED_CUSTOMER"), "Customer is not identified")],
        );
        assert!(matches!(err, Err(StorefrontError::InvalidCustomerToken { .. })));
    }

    #[test]
    fn unidentified_customer_before_sign_in_is_a_user_error() {
        let err = accept_anonymous::<()>(
            "createAccessToken",
            None,
            vec![user_error(Some("UNIDENTIFIED_CUSTOMER"), "Unidentified customer")],
        );
        assert!(
            matches!(&err, Err(StorefrontError::UserErrors { message, .. }) if message == "Unidentified customer"),
            "got: {err:?}"
        );
    }

    #[test]
    fn missing_result_without_errors_is_still_an_error() {
        assert!(matches!(
            accept::<String>("createAddress", None, Vec::new()),
            Err(StorefrontError::UserErrors { .. })
        ));
    }
}
