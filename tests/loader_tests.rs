mod common;

use opdex::data::tables::{load_tables, DirectorySource, TableError, TableId};
use opdex::data::MemorySource;

#[test]
fn full_table_set_decodes_with_row_counts() {
    let tables = load_tables(&common::fixture_source()).expect("fixture should load");

    let summary = tables.summary();
    let characters = summary
        .iter()
        .find(|entry| entry.table == TableId::Character)
        .expect("character table should be summarized");
    assert_eq!(characters.file, "character_table.json");
    // char_005_broken does not decode; everything else does.
    assert_eq!(characters.rows, 6);
    assert_eq!(characters.rejected, 1);
    assert_eq!(tables.characters.rejected()[0].id, "char_005_broken");

    assert_eq!(tables.favor.favor_frames.len(), 2);
    assert_eq!(tables.uniequip.sub_prof_dict.len(), 3);
    assert!(summary.iter().any(|entry| entry.table == TableId::HandbookTeam));
}

#[test]
fn missing_required_table_fails_the_whole_load() {
    let mut source = common::fixture_source();
    source.remove(TableId::Skill);

    match load_tables(&source) {
        Err(TableError::Missing(TableId::Skill)) => {}
        other => panic!("expected missing skill table, got {other:?}"),
    }
}

#[test]
fn team_table_is_optional() {
    let mut source = common::fixture_source();
    source.remove(TableId::HandbookTeam);

    let tables = load_tables(&source).expect("team table should be optional");
    assert!(tables.teams.is_none());
    assert!(tables
        .summary()
        .iter()
        .all(|entry| entry.table != TableId::HandbookTeam));
}

#[test]
fn unparsable_table_is_malformed() {
    let mut source = common::fixture_source();
    source.insert(TableId::BattleEquip, "{ not json");

    let err = load_tables(&source).expect_err("broken json should fail");
    assert!(matches!(
        err,
        TableError::Malformed {
            table: TableId::BattleEquip,
            ..
        }
    ));
    assert!(err.to_string().contains("battle_equip_table.json"));
}

#[test]
fn array_shaped_character_table_is_malformed() {
    let mut source = common::fixture_source();
    source.insert(TableId::Character, "[]");

    assert!(matches!(
        load_tables(&source),
        Err(TableError::Malformed {
            table: TableId::Character,
            ..
        })
    ));
}

#[test]
fn empty_source_reports_first_missing_table() {
    let err = load_tables(&MemorySource::new()).expect_err("nothing to load");
    assert!(matches!(err, TableError::Missing(TableId::Character)));
    assert_eq!(err.to_string(), "required table 'character_table.json' is missing");
}

#[test]
fn directory_source_reads_table_files() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    common::write_fixture_dir(dir.path());

    let tables = load_tables(&DirectorySource::new(dir.path())).expect("directory should load");
    assert_eq!(tables.skills.len(), 3);
    assert!(tables.teams.is_some());
}

#[test]
fn directory_source_without_files_is_missing() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    assert!(matches!(
        load_tables(&DirectorySource::new(dir.path())),
        Err(TableError::Missing(TableId::Character))
    ));
}
