//! In-process stand-in for PostgreSQL used by tests. Enforces the same
//! unique constraints and cascades as `migrations/`.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::error::RepoError;
use crate::posts::{NewPost, Post, PostRepo, PostWithAuthor};
use crate::profiles::{NewProfile, Profile, ProfileRepo, ProfileWithUser};
use crate::users::{NewUser, PublicUser, User, UserRepo};

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    posts: Vec<Post>,
    profiles: Vec<Profile>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn public_user(&self, id: i64) -> Result<PublicUser, RepoError> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(PublicUser::from)
            .ok_or(RepoError::NotFound("user"))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn with<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut tables)
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create(&self, new: NewUser) -> Result<User, RepoError> {
        new.validate()?;
        self.with(|t| {
            if let Some(name) = &new.username {
                if t.users.iter().any(|u| u.username.as_ref() == Some(name)) {
                    return Err(RepoError::UniqueViolation("users_username_key".into()));
                }
            }
            let user = User {
                id: t.next_id(),
                status: new.status,
                email: new.email,
                password: new.password,
                facebook_user_id: new.facebook_user_id,
                username: new.username,
                is_staff: new.is_staff,
                is_superuser: new.is_superuser,
                created_at: OffsetDateTime::now_utc(),
            };
            t.users.push(user.clone());
            Ok(user)
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.with(|t| t.users.iter().find(|u| u.id == id).cloned()))
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.with(|t| {
            let before = t.users.len();
            t.users.retain(|u| u.id != id);
            if t.users.len() == before {
                return Err(RepoError::NotFound("user"));
            }
            t.posts.retain(|p| p.author_id != id);
            t.profiles.retain(|p| p.user_id != id);
            Ok(())
        })
    }

    async fn by_status(&self, status: Option<&str>) -> Result<Vec<User>, RepoError> {
        let status = status.filter(|s| !s.is_empty());
        Ok(self.with(|t| {
            t.users
                .iter()
                .filter(|u| status.map_or(true, |s| u.status.as_str() == s))
                .cloned()
                .collect()
        }))
    }
}

#[async_trait]
impl PostRepo for MemoryStore {
    async fn create(&self, new: NewPost) -> Result<Post, RepoError> {
        new.validate()?;
        self.with(|t| {
            t.public_user(new.author_id)?;
            let post = Post {
                id: t.next_id(),
                author_id: new.author_id,
                title: new.title,
                text: new.text,
                created_date: OffsetDateTime::now_utc(),
                published_date: new.published_date,
            };
            t.posts.push(post.clone());
            Ok(post)
        })
    }

    async fn published_before(
        &self,
        now: OffsetDateTime,
    ) -> Result<Vec<PostWithAuthor>, RepoError> {
        self.with(|t| {
            t.posts
                .iter()
                .filter(|p| p.is_published(now))
                .map(|p| {
                    Ok(PostWithAuthor {
                        author: t.public_user(p.author_id)?,
                        post: p.clone(),
                    })
                })
                .collect()
        })
    }

    async fn publish(&self, id: i64, at: OffsetDateTime) -> Result<Post, RepoError> {
        self.with(|t| {
            let post = t
                .posts
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(RepoError::NotFound("post"))?;
            post.published_date = Some(at);
            Ok(post.clone())
        })
    }
}

#[async_trait]
impl ProfileRepo for MemoryStore {
    async fn create(&self, new: NewProfile) -> Result<Profile, RepoError> {
        new.validate()?;
        self.with(|t| {
            t.public_user(new.user_id)?;
            if t.profiles.iter().any(|p| p.user_id == new.user_id) {
                return Err(RepoError::UniqueViolation("profiles_user_id_key".into()));
            }
            let profile = Profile {
                id: t.next_id(),
                user_id: new.user_id,
                comment: new.comment,
                birthday: new.birthday,
            };
            t.profiles.push(profile.clone());
            Ok(profile)
        })
    }

    async fn get_user_profile(&self, user_id: i64) -> Result<ProfileWithUser, RepoError> {
        self.with(|t| {
            let profile = t
                .profiles
                .iter()
                .find(|p| p.user_id == user_id)
                .cloned()
                .ok_or(RepoError::NotFound("profile"))?;
            Ok(ProfileWithUser {
                user: t.public_user(user_id)?,
                profile,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::UserStatus;
    use time::macros::{date, datetime};

    async fn user(store: &MemoryStore, email: &str, username: Option<&str>, status: UserStatus) -> User {
        let mut new = NewUser::new(email);
        new.username = username.map(str::to_string);
        new.status = status;
        UserRepo::create(store, new).await.unwrap()
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::default();
        user(&store, "a@example.com", Some("alice"), UserStatus::Active).await;

        let mut dup = NewUser::new("b@example.com");
        dup.username = Some("alice".into());
        let err = UserRepo::create(&store, dup).await.unwrap_err();
        assert!(matches!(err, RepoError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn null_usernames_do_not_collide() {
        let store = MemoryStore::default();
        user(&store, "a@example.com", None, UserStatus::Active).await;
        user(&store, "b@example.com", None, UserStatus::Active).await;
        assert_eq!(store.by_status(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn second_profile_for_user_is_rejected() {
        let store = MemoryStore::default();
        let u = user(&store, "a@example.com", None, UserStatus::Active).await;
        let new = NewProfile {
            user_id: u.id,
            comment: "hi".into(),
            birthday: date!(2000-01-01),
        };
        ProfileRepo::create(&store, new.clone()).await.unwrap();
        let err = ProfileRepo::create(&store, new).await.unwrap_err();
        assert!(matches!(err, RepoError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let store = MemoryStore::default();
        let u = user(&store, "a@example.com", None, UserStatus::Active).await;
        let err = store.get_user_profile(u.id).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound("profile")));
    }

    #[tokio::test]
    async fn status_filter_semantics() {
        let store = MemoryStore::default();
        let a = user(&store, "a@example.com", Some("a"), UserStatus::Active).await;
        user(&store, "b@example.com", Some("b"), UserStatus::EmailConfirming).await;
        user(&store, "c@example.com", Some("c"), UserStatus::Deactivated).await;

        let all: Vec<i64> = store.by_status(None).await.unwrap().iter().map(|u| u.id).collect();
        let empty: Vec<i64> = store.by_status(Some("")).await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(all.len(), 3);
        assert_eq!(all, empty);

        let confirming = store.by_status(Some("email_confirming")).await.unwrap();
        assert_eq!(confirming.len(), 1);
        assert_eq!(confirming[0].username.as_deref(), Some("b"));

        assert!(store.by_status(Some("bogus")).await.unwrap().is_empty());

        let active = store.active_users().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, a.id);
        assert!(active.iter().all(User::is_active));
    }

    #[tokio::test]
    async fn published_before_matches_scenario() {
        let store = MemoryStore::default();
        let alice = user(&store, "alice@example.com", Some("alice"), UserStatus::Active).await;
        ProfileRepo::create(
            &store,
            NewProfile {
                user_id: alice.id,
                comment: "hi".into(),
                birthday: date!(2000-01-01),
            },
        )
        .await
        .unwrap();
        let p1 = PostRepo::create(
            &store,
            NewPost {
                author_id: alice.id,
                title: "P1".into(),
                text: String::new(),
                published_date: Some(datetime!(2023-01-01 0:00 UTC)),
            },
        )
        .await
        .unwrap();
        PostRepo::create(
            &store,
            NewPost {
                author_id: alice.id,
                title: "P2".into(),
                text: String::new(),
                published_date: None,
            },
        )
        .await
        .unwrap();

        let posts = store
            .published_before(datetime!(2024-01-01 0:00 UTC))
            .await
            .unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].post.id, p1.id);
        assert_eq!(
            posts[0].author,
            PublicUser {
                id: alice.id,
                username: Some("alice".into())
            }
        );
        assert!(posts.iter().all(|p| p.post.published_date.is_some()));

        let earlier = store
            .published_before(datetime!(2022-06-01 0:00 UTC))
            .await
            .unwrap();
        assert!(earlier.is_empty());
    }

    #[tokio::test]
    async fn deleting_user_cascades() {
        let store = MemoryStore::default();
        let u = user(&store, "a@example.com", None, UserStatus::Active).await;
        let keep = user(&store, "b@example.com", None, UserStatus::Active).await;
        for author_id in [u.id, keep.id] {
            PostRepo::create(
                &store,
                NewPost {
                    author_id,
                    title: "t".into(),
                    text: String::new(),
                    published_date: Some(datetime!(2023-01-01 0:00 UTC)),
                },
            )
            .await
            .unwrap();
        }
        ProfileRepo::create(
            &store,
            NewProfile {
                user_id: u.id,
                comment: String::new(),
                birthday: date!(1990-05-17),
            },
        )
        .await
        .unwrap();

        UserRepo::delete(&store, u.id).await.unwrap();

        assert!(store.find_by_id(u.id).await.unwrap().is_none());
        let posts = store.published_before(OffsetDateTime::now_utc()).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].author.id, keep.id);
        assert!(matches!(
            store.get_user_profile(u.id).await,
            Err(RepoError::NotFound(_))
        ));
        assert!(matches!(
            UserRepo::delete(&store, u.id).await,
            Err(RepoError::NotFound("user"))
        ));
    }

    #[tokio::test]
    async fn post_for_unknown_author_is_rejected() {
        let store = MemoryStore::default();
        let err = PostRepo::create(
            &store,
            NewPost {
                author_id: 12,
                title: "orphan".into(),
                text: String::new(),
                published_date: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::NotFound("user")));
    }
}
