//! Song documents -> song and artist dimension rows.

use super::records::CatalogDocument;
use super::IngestError;
use crate::catalog_store::{ArtistRecord, CatalogStore, SongRecord};

/// Split a song document into its song and artist rows. Every field is
/// copied as-is; nothing is filtered.
pub fn extract_catalog_records(doc: &CatalogDocument) -> (SongRecord, ArtistRecord) {
    let song = SongRecord {
        song_id: doc.song_id.clone(),
        title: doc.title.clone(),
        artist_id: doc.artist_id.clone(),
        year: doc.year,
        duration: doc.duration,
    };
    let artist = ArtistRecord {
        artist_id: doc.artist_id.clone(),
        name: doc.artist_name.clone(),
        location: doc.artist_location.clone(),
        latitude: doc.artist_latitude,
        longitude: doc.artist_longitude,
    };
    (song, artist)
}

/// Extract and write one song document: song first, then artist.
pub fn load_catalog_document(
    store: &dyn CatalogStore,
    doc: &CatalogDocument,
) -> Result<(), IngestError> {
    let (song, artist) = extract_catalog_records(doc);
    store.upsert_song(&song)?;
    store.upsert_artist(&artist)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::MockCatalogStore;
    use mockall::Sequence;

    fn document() -> CatalogDocument {
        CatalogDocument {
            num_songs: Some(1),
            song_id: "SOBLFFE12AF72AA5BA".to_string(),
            title: "Scream".to_string(),
            year: 2009,
            duration: 213.9424,
            artist_id: "ARJNIUY12298900C91".to_string(),
            artist_name: "Adelitas Way".to_string(),
            artist_location: Some(String::new()),
            artist_latitude: None,
            artist_longitude: Some(-90.04892),
        }
    }

    #[test]
    fn projects_document_fields_verbatim() {
        let (song, artist) = extract_catalog_records(&document());
        assert_eq!(
            song,
            SongRecord {
                song_id: "SOBLFFE12AF72AA5BA".to_string(),
                title: "Scream".to_string(),
                artist_id: "ARJNIUY12298900C91".to_string(),
                year: 2009,
                duration: 213.9424,
            }
        );
        assert_eq!(
            artist,
            ArtistRecord {
                artist_id: "ARJNIUY12298900C91".to_string(),
                name: "Adelitas Way".to_string(),
                location: Some(String::new()),
                latitude: None,
                longitude: Some(-90.04892),
            }
        );
    }

    #[test]
    fn writes_song_before_artist() {
        let mut store = MockCatalogStore::new();
        let mut seq = Sequence::new();
        store
            .expect_upsert_song()
            .withf(|s| s.song_id == "SOBLFFE12AF72AA5BA")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        store
            .expect_upsert_artist()
            .withf(|a| a.artist_id == "ARJNIUY12298900C91")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        load_catalog_document(&store, &document()).unwrap();
    }

    #[test]
    fn store_failure_surfaces_as_store_error() {
        let mut store = MockCatalogStore::new();
        store
            .expect_upsert_song()
            .returning(|_| Err(anyhow::anyhow!("disk full")));
        store.expect_upsert_artist().never();

        let err = load_catalog_document(&store, &document()).unwrap_err();
        assert!(matches!(err, IngestError::Store(_)));
    }
}
