//! Password registration and login.

use sea_orm::DatabaseConnection;

use crate::server::{
    data::{owner::OwnerRepository, player::PlayerRepository, user::UserRepository},
    error::{auth::AuthError, rule::RuleViolation, AppError},
    model::{
        player::Availability,
        user::{AccountProfile, CreateUserParam, NewProfile, RegisterParam, Role, User},
    },
    service::{
        admin::code::AdminCodeService, email::EmailService, geo::Geocoder, rule::RuleEngine,
    },
    util::parse::parse_optional_field,
};

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    geocoder: &'a Geocoder,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection, geocoder: &'a Geocoder) -> Self {
        Self { db, geocoder }
    }

    /// Registers a user and the profile matching their role.
    ///
    /// The bootstrap admin code is only checked for admin registrations, and is consumed
    /// inside the account transaction so a refused registration leaves it usable. Players
    /// get coordinates geocoded from their preferred location or city. The user row and
    /// its profile are stored together or not at all.
    ///
    /// # Returns
    /// - `Ok(User)` - The created account
    /// - `Err(AppError::RuleErr)` - First failing registration rule
    /// - `Err(AppError::BadRequest)` - Unknown availability value
    /// - `Err(AppError::BcryptErr)` - Password hashing failed
    /// - `Err(AppError::DbErr)` - Database error, nothing stored
    pub async fn register(
        &self,
        param: RegisterParam,
        admin_codes: &AdminCodeService,
        email: &EmailService,
    ) -> Result<User, AppError> {
        let admin_code = match param.role.as_str() {
            "admin" => param.admin_code.clone(),
            _ => None,
        };
        let admin_code_valid = match admin_code.as_deref() {
            Some(code) => admin_codes.is_valid(code).await,
            None => false,
        };

        let (role, skill_level) = RuleEngine::new(self.db)
            .validate_user_registration(
                &param.email,
                &param.username,
                &param.role,
                param.skill_level.as_deref(),
                &param.password,
                admin_code_valid,
            )
            .await?;
        let availability: Option<Availability> =
            parse_optional_field(param.availability.as_deref())?;

        let password_hash = bcrypt::hash(&param.password, bcrypt::DEFAULT_COST)?;

        let profile = match (role, skill_level) {
            (Role::Player, Some(skill_level)) => {
                let preferred_location = param.preferred_location.or(param.city.clone());
                let coordinates = match preferred_location.as_deref() {
                    Some(location) => self.geocoder.geocode_or_none(location).await,
                    None => None,
                };
                NewProfile::Player {
                    skill_level,
                    preferred_location,
                    availability,
                    coordinates,
                }
            }
            (Role::Owner, _) => NewProfile::Owner {
                business_name: param.business_name,
            },
            _ => NewProfile::None,
        };

        let claim = async {
            match (role, admin_code.as_deref()) {
                (Role::Admin, Some(code)) => admin_codes.validate_and_consume(code).await,
                _ => true,
            }
        };

        let account = UserRepository::new(self.db)
            .create_account(
                CreateUserParam {
                    username: param.username,
                    email: param.email,
                    password_hash,
                    role,
                    full_name: param.full_name,
                    phone: param.phone,
                    city: param.city,
                },
                profile,
                claim,
            )
            .await?
            .ok_or(RuleViolation::InvalidAdminCode)?;

        let user = account.user;
        tracing::info!("Registered user {} as {}", user.id, role.as_str());
        email.send_welcome(&user).await;

        Ok(user)
    }

    /// Checks a username or email and password.
    ///
    /// # Returns
    /// - `Ok(User)` - Credentials match an active account
    /// - `Err(AppError::AuthErr(InvalidCredentials))` - Unknown login or wrong password
    /// - `Err(AppError::AuthErr(AccountDisabled))` - Account deactivated by an admin
    pub async fn login(&self, login: &str, password: &str) -> Result<User, AppError> {
        let Some(credentials) = UserRepository::new(self.db).find_credentials(login).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };

        // Hashes that fail to parse count as a mismatch.
        if !bcrypt::verify(password, &credentials.password_hash).unwrap_or(false) {
            return Err(AuthError::InvalidCredentials.into());
        }

        let user = credentials.user;
        if !user.is_active {
            return Err(AuthError::AccountDisabled(user.id).into());
        }

        tracing::debug!("User {} logged in", user.id);
        Ok(user)
    }

    /// The user with their player or owner profile.
    pub async fn profile(&self, user: User) -> Result<AccountProfile, AppError> {
        let player = PlayerRepository::new(self.db)
            .find_by_user_id(user.id)
            .await?;
        let owner = OwnerRepository::new(self.db)
            .find_by_user_id(user.id)
            .await?;

        Ok(AccountProfile {
            user,
            player,
            owner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::player::SkillLevel;
    use test_utils::builder::TestBuilder;

    fn registration(role: &str) -> RegisterParam {
        RegisterParam {
            username: format!("new_{role}"),
            email: format!("new_{role}@example.com"),
            password: "tennis2026".to_string(),
            role: role.to_string(),
            full_name: Some("New User".to_string()),
            phone: None,
            city: Some("Haifa".to_string()),
            skill_level: Some("advanced".to_string()),
            preferred_location: None,
            availability: Some("evenings".to_string()),
            business_name: Some("Net Gains".to_string()),
            admin_code: None,
        }
    }

    /// Tests a player registration creates the profile and can log in.
    ///
    /// Expected: profile falls back to the city, wrong password and unknown login refused
    #[tokio::test]
    async fn register_player_then_login() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let client = reqwest::Client::new();
        let geocoder = Geocoder::disabled(client.clone());
        let email = EmailService::disabled(client);
        let service = AuthService::new(db, &geocoder);

        let user = service
            .register(registration("player"), &AdminCodeService::new(), &email)
            .await?;
        assert_eq!(user.role, Role::Player);

        let profile = service.profile(user.clone()).await?;
        let player = profile.player.expect("player profile created");
        assert_eq!(player.skill_level, SkillLevel::Advanced);
        assert_eq!(player.preferred_location.as_deref(), Some("Haifa"));
        assert_eq!(player.availability, Some(Availability::Evenings));
        assert!(profile.owner.is_none());

        assert_eq!(service.login("NEW_PLAYER@example.com", "tennis2026").await?.id, user.id);
        assert!(matches!(
            service.login("new_player", "wrong-pass1").await,
            Err(AppError::AuthErr(AuthError::InvalidCredentials))
        ));
        assert!(matches!(
            service.login("nobody", "tennis2026").await,
            Err(AppError::AuthErr(AuthError::InvalidCredentials))
        ));

        Ok(())
    }

    /// Tests admin registration needs the bootstrap code and consumes it.
    ///
    /// Expected: refused without code, accepted once with it, refused on reuse
    #[tokio::test]
    async fn admin_registration_consumes_code() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let client = reqwest::Client::new();
        let geocoder = Geocoder::disabled(client.clone());
        let email = EmailService::disabled(client);
        let service = AuthService::new(db, &geocoder);
        let codes = AdminCodeService::new();
        let code = codes.generate().await;

        let refused = service.register(registration("admin"), &codes, &email).await;
        assert!(matches!(
            refused,
            Err(AppError::RuleErr(RuleViolation::InvalidAdminCode))
        ));

        let mut with_code = registration("admin");
        with_code.admin_code = Some(code.clone());
        let admin = service.register(with_code, &codes, &email).await?;
        assert_eq!(admin.role, Role::Admin);

        let mut reused = registration("admin");
        reused.username = "second_admin".to_string();
        reused.email = "second_admin@example.com".to_string();
        reused.admin_code = Some(code);
        assert!(matches!(
            service.register(reused, &codes, &email).await,
            Err(AppError::RuleErr(RuleViolation::InvalidAdminCode))
        ));

        Ok(())
    }

    /// Tests an admin registration refused by a later rule keeps the code usable.
    ///
    /// Expected: WeakPassword first, the code still valid, and the corrected retry succeeds
    #[tokio::test]
    async fn refused_admin_registration_keeps_code() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let client = reqwest::Client::new();
        let geocoder = Geocoder::disabled(client.clone());
        let email = EmailService::disabled(client);
        let service = AuthService::new(db, &geocoder);
        let codes = AdminCodeService::new();
        let code = codes.generate().await;

        let mut weak = registration("admin");
        weak.password = "short".to_string();
        weak.admin_code = Some(code.clone());
        assert!(matches!(
            service.register(weak, &codes, &email).await,
            Err(AppError::RuleErr(RuleViolation::WeakPassword))
        ));
        assert!(codes.is_valid(&code).await);

        let mut retry = registration("admin");
        retry.admin_code = Some(code.clone());
        let admin = service.register(retry, &codes, &email).await?;
        assert_eq!(admin.role, Role::Admin);
        assert!(!codes.has_valid_code().await);

        Ok(())
    }

    /// Tests owners get a business profile and deactivated accounts cannot log in.
    ///
    /// Expected: owner profile stored; AccountDisabled after deactivation
    #[tokio::test]
    async fn owner_profile_and_disabled_login() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let client = reqwest::Client::new();
        let geocoder = Geocoder::disabled(client.clone());
        let email = EmailService::disabled(client);
        let service = AuthService::new(db, &geocoder);

        let owner = service
            .register(registration("owner"), &AdminCodeService::new(), &email)
            .await?;
        let profile = service.profile(owner.clone()).await?;
        assert_eq!(
            profile.owner.and_then(|o| o.business_name).as_deref(),
            Some("Net Gains")
        );
        assert!(profile.player.is_none());

        UserRepository::new(db).set_active(owner.id, false).await?;
        assert!(matches!(
            service.login("new_owner", "tennis2026").await,
            Err(AppError::AuthErr(AuthError::AccountDisabled(_)))
        ));

        Ok(())
    }
}
