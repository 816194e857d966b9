use std::rc::Rc;
use veda::{Data, Lens};

#[derive(Clone, Debug, PartialEq, Data, Lens)]
struct Settings {
    volume: u8,
    muted: bool,
    r#type: String,
}

#[derive(Clone, Debug, PartialEq, Lens)]
struct Rgb(u8, u8, u8);

#[derive(Clone, Data)]
struct Cached {
    value: i32,
    #[data(ignore)]
    hits: usize,
    #[data(same_fn = "PartialEq::eq")]
    tags: Vec<String>,
}

#[derive(Clone, Data)]
struct Generic<T> {
    inner: T,
}

#[derive(Clone, Data)]
enum Shape {
    Empty,
    Circle(f64),
    Rect {
        w: f64,
        h: f64,
        #[data(ignore)]
        name: String,
    },
}

#[derive(Clone, Data)]
struct Shared(Rc<Vec<u8>>);

#[test]
fn field_lenses() {
    let s = Settings {
        volume: 3,
        muted: false,
        r#type: "speaker".to_string(),
    };
    assert_eq!(Settings::volume.get(&s), 3);
    assert_eq!(Settings::r#type.get(&s), "speaker");

    let s = Settings::muted.set(s, true);
    assert!(s.muted);
    assert_eq!(s.volume, 3);
}

#[test]
fn tuple_field_lenses() {
    let c = Rgb(1, 2, 3);
    assert_eq!(Rgb::elem_1.get(&c), 2);
    assert_eq!(Rgb::elem_2.set(c, 9), Rgb(1, 2, 9));
}

#[test]
fn field_lenses_compose() {
    let list = vec![Rgb(0, 0, 0), Rgb(4, 5, 6)];
    let green = veda::lens::index(1).compose(Rgb::elem_1);
    assert_eq!(green.get(&list), 5);
    assert_eq!(green.set(list, 7)[1], Rgb(4, 7, 6));
}

#[test]
fn field_lenses_are_values() {
    // each field lens is a copyable zero-sized value
    let lens = Settings::volume;
    let copy = lens;
    assert_eq!(std::mem::size_of_val(&copy), 0);
}

#[test]
fn struct_same() {
    let a = Settings {
        volume: 1,
        muted: false,
        r#type: String::new(),
    };
    assert!(a.same(&a.clone()));
    assert!(!a.same(&Settings { volume: 2, ..a.clone() }));
}

#[test]
fn ignored_and_custom_fields() {
    let a = Cached {
        value: 1,
        hits: 0,
        tags: vec!["x".to_string()],
    };
    let b = Cached {
        hits: 40,
        tags: vec!["x".to_string()],
        ..a.clone()
    };
    assert!(a.same(&b));
    let c = Cached {
        tags: vec!["y".to_string()],
        ..a.clone()
    };
    assert!(!a.same(&c));
}

#[test]
fn generic_same() {
    assert!(Generic { inner: 1u8 }.same(&Generic { inner: 1u8 }));
    assert!(!Generic { inner: "a" }.same(&Generic { inner: "b" }));
}

#[test]
fn enum_same() {
    assert!(Shape::Empty.same(&Shape::Empty));
    assert!(!Shape::Empty.same(&Shape::Circle(1.0)));
    assert!(Shape::Circle(f64::NAN).same(&Shape::Circle(f64::NAN)));
    let rect = |name: &str| Shape::Rect {
        w: 1.0,
        h: 2.0,
        name: name.to_string(),
    };
    assert!(rect("a").same(&rect("b")));
    assert!(!rect("a").same(&Shape::Rect {
        w: 1.0,
        h: 3.0,
        name: "a".to_string()
    }));
}

#[test]
fn pointer_fields() {
    let a = Shared(Rc::new(vec![1]));
    assert!(a.same(&a.clone()));
    assert!(!a.same(&Shared(Rc::new(vec![1]))));
}
