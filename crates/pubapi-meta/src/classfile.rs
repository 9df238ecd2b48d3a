//! Minimal JVM class file reader.
//!
//! Only the parts needed for member resolution are decoded: the constant
//! pool (to resolve names), access flags, this/super class, interfaces and
//! the method table. Field and attribute payloads are skipped.

use thiserror::Error;

use crate::descriptor::{normalize_type_name, TypeDescriptor, TypeKind};
use crate::member::{MemberInfo, Visibility};

const MAGIC: u32 = 0xCAFE_BABE;
const ACC_INTERFACE: u16 = 0x0200;

/// Class file decoding failures.
#[derive(Debug, Error)]
pub enum ClassFormatError {
    /// The data does not start with `0xCAFEBABE`.
    #[error("bad magic number 0x{0:08X}")]
    BadMagic(u32),

    /// The data ended in the middle of a structure.
    #[error("unexpected end of class data at offset {0}")]
    Truncated(usize),

    /// A constant pool reference points outside the pool.
    #[error("invalid constant pool index {0}")]
    BadIndex(u16),

    /// A constant pool entry has a tag this reader does not know.
    #[error("unknown constant pool tag {tag} at index {index}")]
    UnknownTag {
        /// Tag byte.
        tag: u8,
        /// Pool index.
        index: u16,
    },

    /// A constant pool entry has the wrong kind for its use site.
    #[error("constant pool entry {index} is not a {expected}")]
    WrongKind {
        /// Pool index.
        index: u16,
        /// Expected entry kind.
        expected: &'static str,
    },
}

/// A method as recorded in the method table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMethod {
    /// Raw access flags.
    pub access_flags: u16,
    /// Method name.
    pub name: String,
    /// Full JVM descriptor.
    pub descriptor: String,
}

/// Decoded class file header and method table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFile {
    /// Class access flags.
    pub access_flags: u16,
    /// Internal name of this class (`a/b/C`).
    pub this_class: String,
    /// Internal name of the superclass; absent only for `java/lang/Object`.
    pub super_class: Option<String>,
    /// Internal names of direct interfaces.
    pub interfaces: Vec<String>,
    /// Declared methods and constructors.
    pub methods: Vec<RawMethod>,
}

impl ClassFile {
    /// Decode a class file.
    pub fn parse(bytes: &[u8]) -> Result<Self, ClassFormatError> {
        let mut reader = Reader::new(bytes);

        let magic = reader.u32()?;
        if magic != MAGIC {
            return Err(ClassFormatError::BadMagic(magic));
        }
        let _minor = reader.u16()?;
        let _major = reader.u16()?;

        let pool = ConstantPool::read(&mut reader)?;

        let access_flags = reader.u16()?;
        let this_class = pool.class_name(reader.u16()?)?;
        let super_index = reader.u16()?;
        let super_class = if super_index == 0 {
            None
        } else {
            Some(pool.class_name(super_index)?)
        };

        let interface_count = reader.u16()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            interfaces.push(pool.class_name(reader.u16()?)?);
        }

        let field_count = reader.u16()?;
        for _ in 0..field_count {
            reader.skip(6)?;
            skip_attributes(&mut reader)?;
        }

        let method_count = reader.u16()?;
        let mut methods = Vec::with_capacity(method_count as usize);
        for _ in 0..method_count {
            let access_flags = reader.u16()?;
            let name = pool.utf8(reader.u16()?)?.to_string();
            let descriptor = pool.utf8(reader.u16()?)?.to_string();
            skip_attributes(&mut reader)?;
            methods.push(RawMethod {
                access_flags,
                name,
                descriptor,
            });
        }

        Ok(Self {
            access_flags,
            this_class,
            super_class,
            interfaces,
            methods,
        })
    }

    /// Check whether the class is an interface.
    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }

    /// Convert into a type descriptor.
    ///
    /// Interfaces report no superclass even though the class file names
    /// `java/lang/Object` there.
    pub fn into_descriptor(self) -> TypeDescriptor {
        let kind = if self.is_interface() {
            TypeKind::Interface
        } else {
            TypeKind::Class
        };
        let superclass = match kind {
            TypeKind::Class => self.super_class.as_deref().map(normalize_type_name),
            _ => None,
        };
        TypeDescriptor {
            name: normalize_type_name(&self.this_class),
            kind,
            methods: self
                .methods
                .iter()
                .map(|m| {
                    MemberInfo::new(
                        m.name.clone(),
                        &m.descriptor,
                        Visibility::from_access_flags(m.access_flags),
                    )
                })
                .collect(),
            superclass,
            interfaces: self.interfaces.iter().map(|i| normalize_type_name(i)).collect(),
        }
    }
}

fn skip_attributes(reader: &mut Reader<'_>) -> Result<(), ClassFormatError> {
    let count = reader.u16()?;
    for _ in 0..count {
        let _name = reader.u16()?;
        let len = reader.u32()?;
        reader.skip(len as usize)?;
    }
    Ok(())
}

#[derive(Debug, Clone)]
enum Constant {
    Unusable,
    Utf8(String),
    Class(u16),
    Other,
}

struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    fn read(reader: &mut Reader<'_>) -> Result<Self, ClassFormatError> {
        let count = reader.u16()?;
        let mut entries = Vec::with_capacity(count as usize);
        // Slot 0 is never used.
        entries.push(Constant::Unusable);

        let mut index = 1u16;
        while index < count {
            let tag = reader.u8()?;
            let (entry, width) = match tag {
                1 => {
                    let len = reader.u16()? as usize;
                    let bytes = reader.bytes(len)?;
                    (Constant::Utf8(String::from_utf8_lossy(bytes).into_owned()), 1)
                }
                7 => (Constant::Class(reader.u16()?), 1),
                3 | 4 => {
                    reader.skip(4)?;
                    (Constant::Other, 1)
                }
                // Long and Double occupy two slots.
                5 | 6 => {
                    reader.skip(8)?;
                    (Constant::Other, 2)
                }
                8 | 16 | 19 | 20 => {
                    reader.skip(2)?;
                    (Constant::Other, 1)
                }
                9 | 10 | 11 | 12 | 17 | 18 => {
                    reader.skip(4)?;
                    (Constant::Other, 1)
                }
                15 => {
                    reader.skip(3)?;
                    (Constant::Other, 1)
                }
                tag => return Err(ClassFormatError::UnknownTag { tag, index }),
            };
            entries.push(entry);
            if width == 2 {
                entries.push(Constant::Unusable);
            }
            index = index.saturating_add(width);
        }

        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&Constant, ClassFormatError> {
        self.entries
            .get(index as usize)
            .ok_or(ClassFormatError::BadIndex(index))
    }

    fn utf8(&self, index: u16) -> Result<&str, ClassFormatError> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value),
            _ => Err(ClassFormatError::WrongKind {
                index,
                expected: "Utf8",
            }),
        }
    }

    fn class_name(&self, index: u16) -> Result<String, ClassFormatError> {
        match self.get(index)? {
            Constant::Class(name_index) => Ok(self.utf8(*name_index)?.to_string()),
            _ => Err(ClassFormatError::WrongKind {
                index,
                expected: "Class",
            }),
        }
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn bytes(&mut self, len: usize) -> Result<&'a [u8], ClassFormatError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(ClassFormatError::Truncated(self.pos))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<(), ClassFormatError> {
        self.bytes(len).map(|_| ())
    }

    fn u8(&mut self) -> Result<u8, ClassFormatError> {
        Ok(self.bytes(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, ClassFormatError> {
        let b = self.bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, ClassFormatError> {
        let b = self.bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ClassBuilder;
    use super::*;
    use crate::member::MethodKey;

    #[test]
    fn test_parse_class() {
        let bytes = ClassBuilder::new("app/Sub", Some("app/Super"), 0x0021)
            .interface("app/Api")
            .method(0x0001, "<init>", "()V")
            .method(0x0001, "run", "(Ljava/lang/String;)V")
            .method(0x0002, "helper", "()I")
            .build();

        let class = ClassFile::parse(&bytes).unwrap();
        assert_eq!(class.this_class, "app/Sub");
        assert_eq!(class.super_class.as_deref(), Some("app/Super"));
        assert_eq!(class.interfaces, vec!["app/Api".to_string()]);
        assert_eq!(class.methods.len(), 3);
        assert!(!class.is_interface());

        let desc = class.into_descriptor();
        assert_eq!(desc.name, "app.Sub");
        assert_eq!(desc.kind, TypeKind::Class);
        assert_eq!(desc.superclass.as_deref(), Some("app.Super"));
        let helper = desc.find_member(&MethodKey::new("helper", "()I")).unwrap();
        assert!(helper.visibility.is_private());
        assert!(desc
            .find_member(&MethodKey::new("run", "(Ljava.lang.String;)V"))
            .is_some());
    }

    #[test]
    fn test_interface_drops_superclass() {
        let bytes = ClassBuilder::new("app/Api", Some("java/lang/Object"), 0x0601)
            .interface("app/BaseApi")
            .method(0x0401, "call", "()V")
            .build();

        let desc = ClassFile::parse(&bytes).unwrap().into_descriptor();
        assert!(desc.is_interface());
        assert!(desc.superclass.is_none());
        assert_eq!(desc.interfaces, vec!["app.BaseApi".to_string()]);
    }

    #[test]
    fn test_bad_magic() {
        let err = ClassFile::parse(&[0, 1, 2, 3, 4, 5, 6, 7]).unwrap_err();
        assert!(matches!(err, ClassFormatError::BadMagic(0x0001_0203)));
    }

    #[test]
    fn test_truncated() {
        let bytes = ClassBuilder::new("app/C", None, 0x0021)
            .method(0x0001, "m", "()V")
            .build();
        let err = ClassFile::parse(&bytes[..bytes.len() - 6]).unwrap_err();
        assert!(matches!(err, ClassFormatError::Truncated(_)));
    }

    #[test]
    fn test_unknown_tag() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC.to_be_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 52, 0, 2, 99]);
        let err = ClassFile::parse(&bytes).unwrap_err();
        assert!(matches!(err, ClassFormatError::UnknownTag { tag: 99, index: 1 }));
    }
}
