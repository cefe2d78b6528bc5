// Copyright (c) 2024 Mike Tsao

use crate::{prelude::*, types::split_entries};

/// Reads the current computed value of each of `names` for `element` and
/// splits them into a [PropertyRecord]. Properties the element doesn't
/// declare produce empty lists. Never fails.
pub fn read_snapshot<P: ProvidesStyles + ?Sized>(
    provider: &P,
    element: ElementUid,
    names: &[PropertyName],
) -> PropertyRecord {
    let mut record = PropertyRecord::default();
    for name in names {
        let raw = provider.computed_value(element, <&'static str>::from(*name));
        record.set_list(*name, split_entries(&raw));
    }
    record
}

/// [read_snapshot] for every recognized property.
pub fn read_all<P: ProvidesStyles + ?Sized>(provider: &P, element: ElementUid) -> PropertyRecord {
    read_snapshot(provider, element, &PropertyName::all())
}
