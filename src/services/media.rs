// Media service: a sub-account's library of uploaded file links.

use crate::db::{DashboardDb, DbMedia};
use crate::error::ServiceError;

pub fn create_media(
    db: &DashboardDb,
    sub_account_id: &str,
    name: &str,
    link: &str,
) -> Result<DbMedia, ServiceError> {
    crate::validation::validate_media(name, link)?;
    if db.get_sub_account(sub_account_id)?.is_none() {
        return Err(ServiceError::NotFound {
            entity: "SubAccount",
            id: sub_account_id.to_string(),
        });
    }
    let now = DashboardDb::now();
    let media = DbMedia {
        id: DashboardDb::new_id(),
        media_type: None,
        name: name.to_string(),
        link: link.to_string(),
        sub_account_id: sub_account_id.to_string(),
        created_at: now.clone(),
        updated_at: now,
    };
    db.insert_media(&media)?;
    log::info!("Added media '{}' to sub-account {}", media.name, sub_account_id);
    Ok(media)
}

/// A sub-account's media, newest first.
pub fn get_all_media(db: &DashboardDb, sub_account_id: &str) -> Result<Vec<DbMedia>, ServiceError> {
    Ok(db.get_media_for_sub_account(sub_account_id)?)
}

/// Delete a media item, returning the removed row.
pub fn delete_media(db: &DashboardDb, media_id: &str) -> Result<DbMedia, ServiceError> {
    let not_found = || ServiceError::NotFound {
        entity: "Media",
        id: media_id.to_string(),
    };
    let media = db.get_media(media_id)?.ok_or_else(not_found)?;
    if !db.delete_media(media_id)? {
        return Err(not_found());
    }
    log::info!("Deleted media '{}' from sub-account {}", media.name, media.sub_account_id);
    Ok(media)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::*;

    fn seeded() -> DashboardDb {
        let db = test_db();
        insert_bare_agency(&db, "ag1");
        insert_bare_sub_account(&db, "sa1", "ag1");
        db
    }

    #[test]
    fn test_library_lifecycle() {
        let db = seeded();
        let logo = create_media(&db, "sa1", "Logo", "https://cdn.test/logo.png").unwrap();
        create_media(&db, "sa1", "Banner", "https://cdn.test/banner.png").unwrap();

        let names: Vec<String> = get_all_media(&db, "sa1")
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Banner", "Logo"]);

        let removed = delete_media(&db, &logo.id).unwrap();
        assert_eq!(removed.link, "https://cdn.test/logo.png");
        assert_eq!(get_all_media(&db, "sa1").unwrap().len(), 1);
        assert!(matches!(
            delete_media(&db, &logo.id),
            Err(ServiceError::NotFound { entity: "Media", .. })
        ));
    }

    #[test]
    fn test_duplicate_link_is_a_storage_fault() {
        let db = seeded();
        create_media(&db, "sa1", "Logo", "https://cdn.test/logo.png").unwrap();
        let err = create_media(&db, "sa1", "Copy", "https://cdn.test/logo.png").unwrap_err();
        assert!(err.is_fault());
    }

    #[test]
    fn test_rejects_bad_input() {
        let db = seeded();
        assert!(matches!(
            create_media(&db, "sa1", "L", "https://cdn.test/x.png"),
            Err(ServiceError::Validation { field: "name", .. })
        ));
        assert!(matches!(
            create_media(&db, "missing", "Logo", "https://cdn.test/x.png"),
            Err(ServiceError::NotFound { entity: "SubAccount", .. })
        ));
    }
}
