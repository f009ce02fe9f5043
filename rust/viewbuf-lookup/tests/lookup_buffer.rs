use std::sync::Arc;

use viewbuf_bytes::LookupBuffer;
use viewbuf_lookup::{
    DecodeOptions, NamedTable, ReadMask, ScanInfo, SignalFlags, ValueTable, decode_lookup_buffer,
};
use viewbuf_testkit::{
    EntryBuilder, ItemValue, LookupBufferBuilder, NamedTableBuilder, ValueTableBuilder, items,
};
use viewbuf_values::{Latin1TextDecoder, TimeDate, TimeZoneContext, TypedValue};

fn decode(builder: &LookupBufferBuilder, options: &DecodeOptions) -> viewbuf_lookup::LookupResult {
    viewbuf_testkit::init_logging_for_tests();
    let buffer = LookupBuffer::from(builder.build());
    decode_lookup_buffer(
        &buffer,
        builder.entry_count(),
        ReadMask::from_bits_retain(builder.mask()),
        ScanInfo::default(),
        options,
    )
    .unwrap()
}

#[test]
fn test_stats_and_column_values() {
    let builder = LookupBufferBuilder::new().stats(42, 0).entry(
        EntryBuilder::new()
            .note_id(0x1007)
            .column_values(ValueTableBuilder::new().item(ItemValue::Number(3.5))),
    );
    assert_eq!(
        ReadMask::from_bits_retain(builder.mask()),
        ReadMask::COLLECTION_STATS | ReadMask::NOTE_ID | ReadMask::SUMMARY_VALUES
    );
    let result = decode(&builder, &DecodeOptions::default());

    assert_eq!(result.stats().unwrap().top_level_entries, 42);
    assert_eq!(result.returned_count(), 1);
    let entry = &result.entries()[0];
    assert_eq!(entry.note_id, Some(0x1007));
    let columns = entry.column_values.as_ref().unwrap();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns.value(0).unwrap(), &TypedValue::Number(3.5));
    assert_eq!(entry.column_value_sizes(), Some(vec![10]));
}

#[test]
fn test_empty_form_yields_default() {
    let builder = LookupBufferBuilder::new().entry(
        EntryBuilder::new()
            .summary(NamedTableBuilder::new().item("Form", ItemValue::Empty)),
    );
    let result = decode(&builder, &DecodeOptions::default());
    let summary = result.entries()[0].summary.as_ref().unwrap();
    assert!(summary.value(0).unwrap().is_absent());
    assert_eq!(summary.get_as_string("form", "Memo").unwrap(), "Memo");
}

#[test]
fn test_truncated_table_header() {
    // Declares 100 items, but the buffer ends right after the header.
    let bytes = vec![4, 0, 100, 0];
    let buffer = LookupBuffer::from(bytes);
    let err = decode_lookup_buffer(
        &buffer,
        1,
        ReadMask::SUMMARY_VALUES,
        ScanInfo::default(),
        &DecodeOptions::default(),
    )
    .unwrap_err();
    assert!(err.is_corrupt_buffer());

    let err = ValueTable::decode(&buffer, 0, &DecodeOptions::default()).unwrap_err();
    assert!(err.is_corrupt_buffer());
    let err = NamedTable::decode(&buffer, 0, &DecodeOptions::default()).unwrap_err();
    assert!(err.is_corrupt_buffer());
}

#[test]
fn test_entry_count_and_order() {
    for count in [0usize, 1, 7, 50] {
        let entries = (0..count as u32).map(|i| {
            EntryBuilder::new()
                .note_id(i + 1)
                .indent_levels((i % 3) as u16)
                .position(&vec![1; (i % 4) as usize + 1])
                .column_values(
                    ValueTableBuilder::new()
                        .item(ItemValue::random())
                        .item(ItemValue::Empty)
                        .item(ItemValue::random()),
                )
        });
        let builder = LookupBufferBuilder::new()
            .stats(count as u32, 7)
            .entries(entries);
        let result = decode(&builder, &DecodeOptions::default());
        assert_eq!(result.returned_count(), count);
        assert_eq!(
            result.entry_ids(),
            (1..=count as u32).collect::<Vec<_>>()
        );
        for entry in result.entries() {
            let columns = entry.column_values.as_ref().unwrap();
            assert_eq!(columns.len(), 3);
            assert!(columns.value(1).unwrap().is_absent());
        }
    }
}

#[test]
fn test_all_variants_in_named_table() {
    let innards = items::timedate(1999, 12, 31, 23, 0, 0, 0);
    let builder = LookupBufferBuilder::new().entry(
        EntryBuilder::new().note_id(3).summary(
            NamedTableBuilder::new()
                .item("Subject", ItemValue::text("Quarterly report"))
                .item("Categories", ItemValue::text_list(&["Finance", "2024"]))
                .item("Amount", ItemValue::Number(1234.5))
                .item("Ranges", ItemValue::NumberList(vec![1.0, 2.0, 3.0]))
                .item("Created", ItemValue::Time(innards))
                .item("Reminders", ItemValue::TimeList(vec![innards]))
                .item(
                    "Custom",
                    ItemValue::Raw {
                        type_code: 0x0700,
                        bytes: vec![1, 2],
                    },
                ),
        ),
    );
    let result = decode(&builder, &DecodeOptions::default());
    let summary = result.entries()[0].summary.as_ref().unwrap();
    assert_eq!(summary.len(), 7);
    assert_eq!(
        summary.get_as_string("subject", "").unwrap(),
        "Quarterly report"
    );
    assert_eq!(
        summary.get_as_string_list("categories", &[]).unwrap(),
        vec!["Finance".to_string(), "2024".to_string()]
    );
    assert_eq!(summary.get_as_number("AMOUNT", 0.0).unwrap(), 1234.5);
    assert_eq!(
        summary.get_as_number_list("ranges", &[]).unwrap(),
        vec![1.0, 2.0, 3.0]
    );
    let created = summary.get_as_time("created").unwrap().unwrap();
    assert_eq!(created.raw(), TimeDate::new(innards));
    assert_eq!(created.to_string(), "1999-12-31T23:00:00+00:00");
    let reminders = summary.get_as_time_list("reminders").unwrap().unwrap();
    assert_eq!(reminders.len(), 1);
    assert_eq!(
        summary.get("custom").unwrap(),
        Some(&TypedValue::Unrecognized { type_code: 0x0700 })
    );
    assert_eq!(summary.get("missing").unwrap(), None);
}

#[test]
fn test_full_entry_layout() {
    let entry = EntryBuilder::new()
        .note_id(0x8000_0002)
        .unid([1, 2])
        .note_class(0x0001)
        .siblings(1)
        .children(2)
        .descendants(3)
        .any_unread(true)
        .indent_levels(0)
        .score(0)
        .unread(false)
        .position(&[2, 1])
        .column_values(ValueTableBuilder::new().item(ItemValue::text("Category")))
        .summary(NamedTableBuilder::new().item("$1", ItemValue::text("Category")));
    let builder = LookupBufferBuilder::new()
        .entry(entry.clone())
        .entry(entry.note_id(0x10));
    let result = decode(&builder, &DecodeOptions::default());
    let [first, second] = result.entries() else {
        panic!("expected two entries");
    };
    assert!(first.is_category());
    assert!(second.is_document());
    assert_eq!(second.position.as_ref().unwrap().to_string(), "2.1");
    assert_eq!(second.any_unread, Some(true));
    assert_eq!(
        second.unid.unwrap().to_string(),
        "00000000000000010000000000000002"
    );
    let summary = second.summary.as_ref().unwrap();
    assert_eq!(summary.get_as_string("$1", "").unwrap(), "Category");
}

#[test]
fn test_concurrent_lazy_access() {
    let builder = LookupBufferBuilder::new().entry(
        EntryBuilder::new().summary(
            NamedTableBuilder::new()
                .item("Subject", ItemValue::text("Shared"))
                .item("Values", ItemValue::NumberList(vec![1.0, 2.0])),
        ),
    );
    let options = DecodeOptions::default()
        .with_decode_all_values(false)
        .with_lazy_text(true);
    let result = decode(&builder, &options);
    let summary = result.entries()[0].summary.clone().unwrap();

    let values = std::thread::scope(|scope| {
        let handles = (0..8)
            .map(|_| {
                let summary = &summary;
                scope.spawn(move || {
                    (
                        summary.get("subject").unwrap().cloned(),
                        summary.get("values").unwrap().cloned(),
                    )
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });
    for value in &values {
        assert_eq!(value, &values[0]);
    }
    assert_eq!(values[0].0.as_ref().unwrap().as_text(), Some("Shared"));
    // Sequential re-reads return the published value.
    assert_eq!(summary.get("subject").unwrap(), values[0].0.as_ref());
}

#[test]
fn test_release_fails_pending_values() {
    let bytes = LookupBufferBuilder::new()
        .entry(
            EntryBuilder::new().column_values(
                ValueTableBuilder::new()
                    .item(ItemValue::text("first"))
                    .item(ItemValue::text("second"))
                    .item(ItemValue::Empty),
            ),
        )
        .build();
    let buffer = LookupBuffer::from(bytes);
    let options = DecodeOptions::default().with_decode_all_values(false);
    let result = decode_lookup_buffer(
        &buffer,
        1,
        ReadMask::SUMMARY_VALUES,
        ScanInfo::default(),
        &options,
    )
    .unwrap();
    let columns = result.entries()[0].column_values.as_ref().unwrap();
    assert_eq!(columns.value(0).unwrap().as_text(), Some("first"));

    assert!(!columns.is_released());
    assert!(buffer.release());
    assert!(columns.is_released());

    // Materialized values stay readable.
    assert_eq!(columns.value(0).unwrap().as_text(), Some("first"));
    assert!(columns.value(2).unwrap().is_absent());
    assert!(columns.value(1).unwrap_err().is_buffer_released());

    let err = decode_lookup_buffer(
        &buffer,
        1,
        ReadMask::SUMMARY_VALUES,
        ScanInfo::default(),
        &options,
    )
    .unwrap_err();
    assert!(err.is_buffer_released());
}

#[test]
fn test_lazy_text_survives_release() {
    let bytes = ValueTableBuilder::new()
        .item(ItemValue::Text(vec![0x47, 0xfc, 0x6e, 0x74, 0x65, 0x72]))
        .build();
    let buffer = LookupBuffer::from(bytes);
    let options = DecodeOptions::default()
        .with_lazy_text(true)
        .with_text_decoder(Arc::new(Latin1TextDecoder));
    let (table, _) = ValueTable::decode(&buffer, 0, &options).unwrap();
    buffer.release();
    assert_eq!(table.value(0).unwrap().as_text(), Some("Günter"));
}

#[test]
fn test_scan_info_pass_through() {
    let builder = LookupBufferBuilder::new().entry(EntryBuilder::new().note_id(1));
    let buffer = LookupBuffer::from(builder.build());
    let scan = ScanInfo {
        skipped_count: 10,
        signal_flags: SignalFlags::MORE_TO_DO | SignalFlags::INDEX,
        cursor_token: Some("1.2".to_string()),
        sequence_number: 99,
        diff_time: Some(TimeDate::new(items::timedate(2024, 1, 1, 0, 0, 0, 0))),
    };
    let options = DecodeOptions::default()
        .with_time_zone(TimeZoneContext::new(120, false).unwrap())
        .with_single_column_lookup_name("Subject");
    let result =
        decode_lookup_buffer(&buffer, 1, ReadMask::NOTE_ID, scan.clone(), &options).unwrap();
    assert_eq!(result.scan_info(), &scan);
    assert!(result.has_more_to_do());
    assert_eq!(result.skipped_count(), 10);
    assert_eq!(result.cursor_token(), Some("1.2"));
    assert_eq!(result.sequence_number(), 99);
    assert!(result.stats().is_none());
    assert_eq!(
        result.entries()[0].single_column_lookup_name.as_deref(),
        Some("Subject")
    );
}

#[test]
fn test_missing_entries_fail() {
    let builder = LookupBufferBuilder::new().entry(EntryBuilder::new().note_id(1));
    let buffer = LookupBuffer::from(builder.build());
    let err = decode_lookup_buffer(
        &buffer,
        2,
        ReadMask::NOTE_ID,
        ScanInfo::default(),
        &DecodeOptions::default(),
    )
    .unwrap_err();
    assert!(err.is_corrupt_buffer());
}

#[test]
fn test_entry_count_beyond_buffer_fails() {
    let buffer = LookupBuffer::from(vec![1, 0, 0, 0]);
    for count in [u32::MAX as usize, usize::MAX / 2] {
        let err = decode_lookup_buffer(
            &buffer,
            count,
            ReadMask::NOTE_ID,
            ScanInfo::default(),
            &DecodeOptions::default(),
        )
        .unwrap_err();
        assert!(err.is_corrupt_buffer());
    }
}
