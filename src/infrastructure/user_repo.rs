use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{NewUser, User};
use crate::schema::users;

use super::models::{UserFields, UserRow};

pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for DieselUserRepository {
    fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(users::table)
            .values(&UserFields {
                name: &user.name,
                phone: &user.phone,
                email: &user.email,
                password_hash: &user.password_hash,
                address: &user.address,
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }

    fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(users::table.find(user.id))
            .set(&UserFields {
                name: &user.name,
                phone: &user.phone,
                email: &user.email,
                password_hash: &user.password_hash,
                address: &user.address,
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or_else(|| DomainError::not_found("User", user.id))?;

        Ok(row.into())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(User::from))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(User::from))
    }

    fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        // Orders, order lines, the tracking sequence and the wishlist cascade.
        let deleted = diesel::delete(users::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::DieselUserRepository;
    use crate::domain::errors::DomainError;
    use crate::domain::ports::{ProductRepository, UserRepository, WishlistRepository};
    use crate::domain::user::NewUser;
    use crate::infrastructure::product_repo::DieselProductRepository;
    use crate::infrastructure::test_support::{headphone, seed_user, setup_db};
    use crate::infrastructure::wishlist_repo::DieselWishlistRepository;

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn create_and_find_by_email() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool.clone());
        let user = seed_user(&pool, "Juan Perez", "juan@example.com");

        let found = repo
            .find_by_email("juan@example.com")
            .expect("find failed")
            .expect("user should exist");

        assert_eq!(found, user);
        assert!(repo.find_by_email("nobody@example.com").unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn duplicate_email_is_a_conflict() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool.clone());
        seed_user(&pool, "Juan Perez", "juan@example.com");

        let result = repo.create(NewUser {
            name: "Otro Juan".to_string(),
            phone: String::new(),
            email: "juan@example.com".to_string(),
            password_hash: "x$y".to_string(),
            address: String::new(),
        });

        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn delete_cascades_to_wishlist() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool.clone());
        let wishlists = DieselWishlistRepository::new(pool.clone());
        let user = seed_user(&pool, "Juan Perez", "juan@example.com");
        let product = DieselProductRepository::new(pool.clone())
            .create(headphone("HD 25"))
            .unwrap();
        wishlists.add_product(user.id, product.id).unwrap();

        assert!(repo.delete(user.id).unwrap());
        assert!(repo.find_by_id(user.id).unwrap().is_none());
        assert!(wishlists.find_by_user(user.id).unwrap().is_none());
        assert!(!repo.delete(user.id).unwrap());
    }
}
