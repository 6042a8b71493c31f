//! Override compatibility between interface declarations and class
//! implementations.

use secflow::ast::{ClassDecl, Decl, MethodImpl, Model, Pos};

use crate::support::*;

#[test]
fn implementation_above_declared_return_label_is_reported() {
    let mut m = Model::new();
    m.ensure_default_lattice();

    // interface I { [Low] Int foo(); }
    let int_low = ty_secrecy(&mut m, "Int", "Low", 2);
    let decl_sig = sig(&mut m, "foo", int_low, vec![], 2);
    let iface = interface(&mut m, "I", vec![decl_sig], 1);

    // class C implements I { [High] Int foo() {} }
    let int_high = ty_secrecy(&mut m, "Int", "High", 6);
    let impl_sig = sig(&mut m, "foo", int_high, vec![], 6);
    let class = ClassDecl {
        name: m.intern("C"),
        implements: vec![m.intern("I")],
        fields: vec![],
        methods: vec![MethodImpl {
            sig: impl_sig,
            body: vec![],
        }],
        pos: Pos::line(5),
    };
    install(&mut m, vec![Decl::Interface(iface), Decl::Class(class)]);

    assert_eq!(
        run_check(&mut m).fixture_lines(),
        vec!["6:Secrecy level may be at most Low but was High"]
    );
}

#[test]
fn matching_implementation_at_or_below_declared_label_passes() {
    let mut m = Model::new();
    m.ensure_default_lattice();

    // interface I { [High] Int foo(); }  class may stay below.
    let int_high = ty_secrecy(&mut m, "Int", "High", 2);
    let decl_sig = sig(&mut m, "foo", int_high, vec![], 2);
    let iface = interface(&mut m, "I", vec![decl_sig], 1);

    let int_low = ty_secrecy(&mut m, "Int", "Low", 6);
    let impl_sig = sig(&mut m, "foo", int_low, vec![], 6);
    let class = ClassDecl {
        name: m.intern("C"),
        implements: vec![m.intern("I")],
        fields: vec![],
        methods: vec![MethodImpl {
            sig: impl_sig,
            body: vec![],
        }],
        pos: Pos::line(5),
    };
    install(&mut m, vec![Decl::Interface(iface), Decl::Class(class)]);

    assert!(run_check(&mut m).is_empty());
}

#[test]
fn parameter_labels_are_checked_even_when_reordered() {
    let mut m = Model::new();
    m.ensure_default_lattice();

    // interface I { Unit foo([Low] Int a, [Low] Int b); }
    let a_low = ty_secrecy(&mut m, "Int", "Low", 2);
    let pa = param(&mut m, "a", a_low);
    let b_low = ty_secrecy(&mut m, "Int", "Low", 2);
    let pb = param(&mut m, "b", b_low);
    let unit_a = ty(&mut m, "Unit", 2);
    let decl_sig = sig(&mut m, "foo", unit_a, vec![pa, pb], 2);
    let iface = interface(&mut m, "I", vec![decl_sig], 1);

    // class C implements I { Unit foo([Low] Int b, [High] Int a) {} }
    // Parameter order differs; the match is by (name, type) multiset
    // and the High on `a` still violates the declaration.
    let b_low2 = ty_secrecy(&mut m, "Int", "Low", 6);
    let qb = param(&mut m, "b", b_low2);
    let a_high = ty_secrecy(&mut m, "Int", "High", 6);
    let qa = param(&mut m, "a", a_high);
    let unit_b = ty(&mut m, "Unit", 6);
    let impl_sig = sig(&mut m, "foo", unit_b, vec![qb, qa], 6);
    let class = ClassDecl {
        name: m.intern("C"),
        implements: vec![m.intern("I")],
        fields: vec![],
        methods: vec![MethodImpl {
            sig: impl_sig,
            body: vec![],
        }],
        pos: Pos::line(5),
    };
    install(&mut m, vec![Decl::Interface(iface), Decl::Class(class)]);

    assert_eq!(
        run_check(&mut m).fixture_lines(),
        vec!["6:Secrecy level may be at most Low but was High"]
    );
}

#[test]
fn renamed_parameter_fails_the_signature_match() {
    let mut m = Model::new();
    m.ensure_default_lattice();

    let p_low = ty_secrecy(&mut m, "Int", "Low", 2);
    let pa = param(&mut m, "a", p_low);
    let unit_a = ty(&mut m, "Unit", 2);
    let decl_sig = sig(&mut m, "foo", unit_a, vec![pa], 2);
    let iface = interface(&mut m, "I", vec![decl_sig], 1);

    // Same method name and types, but the parameter is renamed: the
    // signatures do not match, so no override check runs at all.
    let q_high = ty_secrecy(&mut m, "Int", "High", 6);
    let qc = param(&mut m, "c", q_high);
    let unit_b = ty(&mut m, "Unit", 6);
    let impl_sig = sig(&mut m, "foo", unit_b, vec![qc], 6);
    let class = ClassDecl {
        name: m.intern("C"),
        implements: vec![m.intern("I")],
        fields: vec![],
        methods: vec![MethodImpl {
            sig: impl_sig,
            body: vec![],
        }],
        pos: Pos::line(5),
    };
    install(&mut m, vec![Decl::Interface(iface), Decl::Class(class)]);

    assert!(run_check(&mut m).is_empty());
}

#[test]
fn unannotated_interface_method_is_not_harvested() {
    let mut m = Model::new();
    m.ensure_default_lattice();

    // The interface side carries no labels at all, so it never becomes
    // an override candidate, even with a High implementation.
    let int_plain = ty(&mut m, "Int", 2);
    let decl_sig = sig(&mut m, "foo", int_plain, vec![], 2);
    let iface = interface(&mut m, "I", vec![decl_sig], 1);

    let int_high = ty_secrecy(&mut m, "Int", "High", 6);
    let impl_sig = sig(&mut m, "foo", int_high, vec![], 6);
    let class = ClassDecl {
        name: m.intern("C"),
        implements: vec![m.intern("I")],
        fields: vec![],
        methods: vec![MethodImpl {
            sig: impl_sig,
            body: vec![],
        }],
        pos: Pos::line(5),
    };
    install(&mut m, vec![Decl::Interface(iface), Decl::Class(class)]);

    assert!(run_check(&mut m).is_empty());
}

#[test]
fn parameter_only_annotation_makes_the_interface_method_a_candidate() {
    let mut m = Model::new();
    m.ensure_default_lattice();

    // Return unannotated, one [Low] parameter: still harvested.
    let p_low = ty_secrecy(&mut m, "Int", "Low", 2);
    let pa = param(&mut m, "p", p_low);
    let unit_a = ty(&mut m, "Unit", 2);
    let decl_sig = sig(&mut m, "foo", unit_a, vec![pa], 2);
    let iface = interface(&mut m, "I", vec![decl_sig], 1);

    let q_high = ty_secrecy(&mut m, "Int", "High", 6);
    let qa = param(&mut m, "p", q_high);
    let unit_b = ty(&mut m, "Unit", 6);
    let impl_sig = sig(&mut m, "foo", unit_b, vec![qa], 6);
    let class = ClassDecl {
        name: m.intern("C"),
        implements: vec![m.intern("I")],
        fields: vec![],
        methods: vec![MethodImpl {
            sig: impl_sig,
            body: vec![],
        }],
        pos: Pos::line(5),
    };
    install(&mut m, vec![Decl::Interface(iface), Decl::Class(class)]);

    assert_eq!(
        run_check(&mut m).fixture_lines(),
        vec!["6:Secrecy level may be at most Low but was High"]
    );
}

#[test]
fn class_declared_before_its_interface_is_still_checked() {
    let mut m = Model::new();
    m.ensure_default_lattice();

    let int_high = ty_secrecy(&mut m, "Int", "High", 3);
    let impl_sig = sig(&mut m, "foo", int_high, vec![], 3);
    let class = ClassDecl {
        name: m.intern("C"),
        implements: vec![m.intern("I")],
        fields: vec![],
        methods: vec![MethodImpl {
            sig: impl_sig,
            body: vec![],
        }],
        pos: Pos::line(2),
    };

    let int_low = ty_secrecy(&mut m, "Int", "Low", 8);
    let decl_sig = sig(&mut m, "foo", int_low, vec![], 8);
    let iface = interface(&mut m, "I", vec![decl_sig], 7);

    // Class first in the module; extraction must not care.
    install(&mut m, vec![Decl::Class(class), Decl::Interface(iface)]);

    assert_eq!(
        run_check(&mut m).fixture_lines(),
        vec!["3:Secrecy level may be at most Low but was High"]
    );
}
